use async_trait::async_trait;
use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{CreateBatch, RepositoryError, RepositoryResult};

use super::repo_impl::AtensiPeriodRepositoryImpl;

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn create_batch_impl(
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
                INSERT INTO cacm_atensi (
                    id, tahun, kd_pemda, no_atensi, tgl_atensi, tgl_cutoff, keterangan,
                    jlh_desa, jlh_rf, jlh_tl, is_sent, create_by, create_at, update_by, update_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(item.id)
            .bind(item.fiscal_year)
            .bind(item.region_code.as_str())
            .bind(item.period_number.as_str())
            .bind(item.raised_date)
            .bind(item.cutoff_date)
            .bind(item.note.as_deref())
            .bind(item.village_count)
            .bind(item.flag_count)
            .bind(item.resolved_count)
            .bind(item.is_sent)
            .bind(item.created_by.as_deref())
            .bind(item.created_at)
            .bind(item.updated_by.as_deref())
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<AtensiPeriodModel> for AtensiPeriodRepositoryImpl {
    async fn create_batch(&self, items: Vec<AtensiPeriodModel>) -> RepositoryResult<Vec<AtensiPeriodModel>> {
        self.create_batch_impl(items).await
    }
}
