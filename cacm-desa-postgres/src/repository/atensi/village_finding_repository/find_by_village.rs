use cacm_desa_db::models::VillageFindingModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::VillageFindingRepositoryImpl;
use crate::utils::TryFromRow;

impl VillageFindingRepositoryImpl {
    pub(super) async fn find_by_village_impl(
        &self,
        period_id: Uuid,
        village_code: &str,
    ) -> RepositoryResult<Option<VillageFindingModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa WHERE atensi_id = $1 AND kd_desa = $2")
                .bind(period_id)
                .bind(village_code)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(VillageFindingModel::try_from_row).transpose()
    }
}
