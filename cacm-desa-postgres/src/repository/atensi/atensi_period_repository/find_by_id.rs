use async_trait::async_trait;
use cacm_desa_db::models::AtensiPeriodModel;
use cacm_desa_db::repository::{FindById, RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::AtensiPeriodRepositoryImpl;
use crate::utils::TryFromRow;

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn find_by_id_impl(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(AtensiPeriodModel::try_from_row).transpose()
    }
}

#[async_trait]
impl FindById<AtensiPeriodModel> for AtensiPeriodRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        self.find_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::repository::{CreateBatch, FindById};
    use serial_test::serial;
    use uuid::Uuid;

    use super::super::test_utils::test_utils::create_test_period;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_find_by_id() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.repos().period_repository;

        let period = create_test_period(2025, "1234", "FIND-001");
        let saved = repo.create_batch(vec![period.clone()]).await?;

        let found = repo.find_by_id(saved[0].id).await?;
        assert_eq!(found, Some(period));

        assert!(repo.find_by_id(Uuid::new_v4()).await?.is_none());
        Ok(())
    }
}
