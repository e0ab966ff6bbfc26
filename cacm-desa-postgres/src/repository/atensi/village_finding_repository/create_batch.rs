use async_trait::async_trait;
use cacm_desa_db::models::VillageFindingModel;
use cacm_desa_db::repository::{CreateBatch, RepositoryError, RepositoryResult};

use super::repo_impl::VillageFindingRepositoryImpl;

#[async_trait]
impl CreateBatch<VillageFindingModel> for VillageFindingRepositoryImpl {
    async fn create_batch(&self, items: Vec<VillageFindingModel>) -> RepositoryResult<Vec<VillageFindingModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO cacm_atensi_desa (
                    id, atensi_id, tahun, kd_pemda, no_atensi, kd_desa,
                    jlh_rf, jlh_tl, status_tl, status_ver, update_by, update_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(item.id)
            .bind(item.period_id)
            .bind(item.fiscal_year)
            .bind(item.region_code.as_str())
            .bind(item.period_number.as_str())
            .bind(item.village_code.as_str())
            .bind(item.flag_count)
            .bind(item.resolved_count)
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
