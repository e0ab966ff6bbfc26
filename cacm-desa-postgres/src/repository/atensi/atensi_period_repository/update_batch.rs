use async_trait::async_trait;
use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult, UpdateBatch};

use super::repo_impl::AtensiPeriodRepositoryImpl;

impl AtensiPeriodRepositoryImpl {
    /// `is_sent` is not written here; only `mark_sent` may set it.
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<AtensiPeriodModel>,
    ) -> RepositoryResult<Vec<AtensiPeriodModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                UPDATE cacm_atensi
                SET no_atensi = $2, tgl_atensi = $3, tgl_cutoff = $4, keterangan = $5,
                    jlh_desa = $6, jlh_rf = $7, jlh_tl = $8, update_by = $9, update_at = $10
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.period_number.as_str())
            .bind(item.raised_date)
            .bind(item.cutoff_date)
            .bind(item.note.as_deref())
            .bind(item.village_count)
            .bind(item.flag_count)
            .bind(item.resolved_count)
            .bind(item.updated_by.as_deref())
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<AtensiPeriodModel> for AtensiPeriodRepositoryImpl {
    async fn update_batch(&self, items: Vec<AtensiPeriodModel>) -> RepositoryResult<Vec<AtensiPeriodModel>> {
        self.update_batch_impl(items).await
    }
}
