use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::VillageFindingRepositoryImpl;

impl VillageFindingRepositoryImpl {
    pub(super) async fn increment_counters_impl(
        &self,
        id: Uuid,
        flag_delta: i32,
        resolved_delta: i32,
    ) -> RepositoryResult<()> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        sqlx::query(
            "UPDATE cacm_atensi_desa SET jlh_rf = jlh_rf + $2, jlh_tl = jlh_tl + $3 WHERE id = $1",
        )
        .bind(id)
        .bind(flag_delta)
        .bind(resolved_delta)
        .execute(&mut **transaction)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::repository::{CreateBatch, FindById, VillageFindingRepository};
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_finding;
    use crate::repository::atensi::atensi_period_repository::test_utils::test_utils::create_test_period;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_increment_counters() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "CNT-001")])
            .await?
            .remove(0);
        let finding = create_test_finding(&period, "123401200100");
        repos.finding_repository.create_batch(vec![finding.clone()]).await?;

        repos.finding_repository.increment_counters(finding.id, 1, 0).await?;
        repos.finding_repository.increment_counters(finding.id, 0, 1).await?;

        let reloaded = repos.finding_repository.find_by_id(finding.id).await?.unwrap();
        assert_eq!(reloaded.flag_count, finding.flag_count + 1);
        assert_eq!(reloaded.resolved_count, finding.resolved_count + 1);
        Ok(())
    }
}
