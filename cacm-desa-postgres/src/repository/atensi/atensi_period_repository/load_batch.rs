use async_trait::async_trait;
use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{LoadBatch, RepositoryError, RepositoryResult};
use std::collections::HashMap;
use uuid::Uuid;

use super::repo_impl::AtensiPeriodRepositoryImpl;
use crate::utils::TryFromRow;

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn load_batch_impl(
        &self,
        ids: &[Uuid],
    ) -> RepositoryResult<Vec<Option<AtensiPeriodModel>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut item_map = HashMap::new();
        for row in rows {
            let item = AtensiPeriodModel::try_from_row(&row)?;
            item_map.insert(item.id, item);
        }

        Ok(ids.iter().map(|id| item_map.remove(id)).collect())
    }
}

#[async_trait]
impl LoadBatch<AtensiPeriodModel> for AtensiPeriodRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<AtensiPeriodModel>>> {
        self.load_batch_impl(ids).await
    }
}
