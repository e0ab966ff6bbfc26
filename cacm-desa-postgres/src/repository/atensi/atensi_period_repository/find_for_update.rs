use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::AtensiPeriodRepositoryImpl;
use crate::utils::TryFromRow;

impl AtensiPeriodRepositoryImpl {
    /// A second dispatcher of the same period blocks here until the first
    /// session ends, then reads the committed `is_sent`.
    pub(super) async fn find_for_update_impl(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(AtensiPeriodModel::try_from_row).transpose()
    }
}
