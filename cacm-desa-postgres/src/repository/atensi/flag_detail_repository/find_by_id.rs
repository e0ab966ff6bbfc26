use async_trait::async_trait;
use cacm_desa_db::models::FlagDetailModel;
use cacm_desa_db::repository::{FindById, RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::FlagDetailRepositoryImpl;
use crate::utils::TryFromRow;

#[async_trait]
impl FindById<FlagDetailModel> for FlagDetailRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa_rinc WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(FlagDetailModel::try_from_row).transpose()
    }
}
