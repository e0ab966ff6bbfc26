use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::repo_impl::AtensiPeriodRepositoryImpl;

impl AtensiPeriodRepositoryImpl {
    pub(super) async fn mark_sent_impl(
        &self,
        id: Uuid,
        actor: &str,
        at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        let result = sqlx::query(
            r#"
            UPDATE cacm_atensi
            SET is_sent = TRUE, update_by = $2, update_at = $3
            WHERE id = $1 AND is_sent = FALSE
            "#,
        )
        .bind(id)
        .bind(actor)
        .bind(at)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::repository::{AtensiPeriodRepository, CreateBatch};
    use chrono::Utc;
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_period;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_mark_sent_only_once() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.repos().period_repository;

        let period = repo
            .create_batch(vec![create_test_period(2025, "1234", "SENT-001")])
            .await?
            .remove(0);

        assert!(repo.mark_sent(period.id, "admin", Utc::now()).await?);
        assert!(!repo.mark_sent(period.id, "admin", Utc::now()).await?);
        Ok(())
    }
}
