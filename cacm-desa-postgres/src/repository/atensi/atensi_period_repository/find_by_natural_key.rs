use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};

use super::repo_impl::AtensiPeriodRepositoryImpl;
use crate::utils::TryFromRow;

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn find_by_natural_key_impl(
        &self,
        fiscal_year: i32,
        region_code: &str,
        period_number: &str,
    ) -> RepositoryResult<Option<AtensiPeriodModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                "SELECT * FROM cacm_atensi WHERE tahun = $1 AND kd_pemda = $2 AND no_atensi = $3",
            )
            .bind(fiscal_year)
            .bind(region_code)
            .bind(period_number)
            .fetch_optional(&mut **transaction)
            .await?
        };
        row.as_ref().map(AtensiPeriodModel::try_from_row).transpose()
    }
}
