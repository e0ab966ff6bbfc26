use async_trait::async_trait;
use cacm_desa_db::models::VillageFindingModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult, UpdateBatch};

use super::repo_impl::VillageFindingRepositoryImpl;

impl VillageFindingRepositoryImpl {
    /// Writes the status columns only. Counters move through
    /// `increment_counters` and the natural key follows the period.
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<VillageFindingModel>,
    ) -> RepositoryResult<Vec<VillageFindingModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                UPDATE cacm_atensi_desa
                SET status_tl = $2, status_ver = $3, update_by = $4, update_at = $5
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.follow_up_status.code())
            .bind(item.verification_status.code())
            .bind(item.updated_by.as_deref())
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<VillageFindingModel> for VillageFindingRepositoryImpl {
    async fn update_batch(&self, items: Vec<VillageFindingModel>) -> RepositoryResult<Vec<VillageFindingModel>> {
        self.update_batch_impl(items).await
    }
}
