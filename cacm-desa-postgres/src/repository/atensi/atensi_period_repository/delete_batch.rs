use async_trait::async_trait;
use cacm_desa_db::repository::{DeleteBatch, RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::AtensiPeriodRepositoryImpl;

impl AtensiPeriodRepositoryImpl {
    /// Findings, details and history go with the period through ON DELETE CASCADE.
    pub(super) async fn delete_batch_impl(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        let result = sqlx::query("DELETE FROM cacm_atensi WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}

#[async_trait]
impl DeleteBatch for AtensiPeriodRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        self.delete_batch_impl(ids).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::repository::{CreateBatch, DeleteBatch, FindById};
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_period;
    use crate::repository::atensi::flag_detail_repository::test_utils::test_utils::create_test_detail;
    use crate::repository::atensi::village_finding_repository::test_utils::test_utils::create_test_finding;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_delete_cascades() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "DEL-001")])
            .await?
            .remove(0);
        let finding = create_test_finding(&period, "123401200100");
        repos.finding_repository.create_batch(vec![finding.clone()]).await?;
        let detail = create_test_detail(&finding, 10, "BKT-1");
        repos.detail_repository.create_batch(vec![detail.clone()]).await?;

        assert_eq!(repos.period_repository.delete_batch(&[period.id]).await?, 1);
        assert!(repos.finding_repository.find_by_id(finding.id).await?.is_none());
        assert!(repos.detail_repository.find_by_id(detail.id).await?.is_none());
        Ok(())
    }
}
