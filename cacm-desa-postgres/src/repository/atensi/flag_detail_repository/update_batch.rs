use async_trait::async_trait;
use cacm_desa_db::models::FlagDetailModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult, UpdateBatch};

use super::repo_impl::FlagDetailRepositoryImpl;

impl FlagDetailRepositoryImpl {
    /// Writes status and remediation columns. Evidence data is fixed once archived.
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<FlagDetailModel>,
    ) -> RepositoryResult<Vec<FlagDetailModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                UPDATE cacm_atensi_desa_rinc
                SET status_tl = $2, status_ver = $3, nama_tl = $4, komen_tl = $5,
                    nama_file = $6, update_by = $7, update_at = $8
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.follow_up_status.code())
            .bind(item.verification_status.code())
            .bind(item.responder_name.as_deref())
            .bind(item.responder_comment.as_deref())
            .bind(item.attached_file_name.as_deref())
            .bind(item.updated_by.as_deref())
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<FlagDetailModel> for FlagDetailRepositoryImpl {
    async fn update_batch(&self, items: Vec<FlagDetailModel>) -> RepositoryResult<Vec<FlagDetailModel>> {
        self.update_batch_impl(items).await
    }
}
