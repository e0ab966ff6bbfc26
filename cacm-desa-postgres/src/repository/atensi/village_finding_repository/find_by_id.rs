use async_trait::async_trait;
use cacm_desa_db::models::VillageFindingModel;
use cacm_desa_db::repository::{FindById, RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::VillageFindingRepositoryImpl;
use crate::utils::TryFromRow;

#[async_trait]
impl FindById<VillageFindingModel> for VillageFindingRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<VillageFindingModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(VillageFindingModel::try_from_row).transpose()
    }
}
