use cacm_desa_db::models::FlagDetailModel;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::FlagDetailRepositoryImpl;
use crate::utils::TryFromRow;

impl FlagDetailRepositoryImpl {
    /// A second responder to the same row blocks here until the first
    /// session ends, then reads the committed status.
    pub(super) async fn find_for_update_impl(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa_rinc WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(FlagDetailModel::try_from_row).transpose()
    }

    pub(super) async fn list_by_period_for_update_impl(
        &self,
        period_id: Uuid,
    ) -> RepositoryResult<Vec<FlagDetailModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_atensi_desa_rinc
                WHERE atensi_id = $1
                ORDER BY kd_desa, jns_atensi, no_bukti
                FOR UPDATE
                "#,
            )
            .bind(period_id)
            .fetch_all(&mut **transaction)
            .await?
        };
        rows.iter().map(FlagDetailModel::try_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_shared_repos;
    use cacm_desa_db::models::{FlagDetailModel, FollowUpStatus};
    use cacm_desa_db::repository::{CreateBatch, DeleteBatch, UpdateBatch};
    use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
    use serial_test::serial;
    use std::time::Duration;

    use super::super::test_utils::test_utils::create_test_detail;
    use crate::repository::atensi::atensi_period_repository::test_utils::test_utils::create_test_period;
    use crate::repository::atensi::village_finding_repository::test_utils::test_utils::create_test_finding;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_locked_row_waits_for_the_holder() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let period = create_test_period(2032, "9201", "LOCK-001");
        let finding = create_test_finding(&period, "920101200100");
        let mut detail = create_test_detail(&finding, 10, "L-1");
        detail.follow_up_status = FollowUpStatus::Dispatched;

        let session = repos.begin().await?;
        session.periods().create_batch(vec![period.clone()]).await?;
        session.findings().create_batch(vec![finding.clone()]).await?;
        session.details().create_batch(vec![detail.clone()]).await?;
        session.commit().await?;

        let holder = repos.begin().await?;
        let mut held = holder
            .details()
            .find_for_update(detail.id)
            .await?
            .ok_or("seeded detail missing")?;

        let waiter = tokio::spawn({
            let repos = setup_shared_repos().await?;
            let detail_id = detail.id;
            async move {
                let session = repos.begin().await?;
                let seen = session.details().find_for_update(detail_id).await?;
                session.rollback().await?;
                Ok::<_, Box<dyn std::error::Error + Send + Sync>>(seen.map(|d| d.follow_up_status))
            }
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!waiter.is_finished());

        held.follow_up_status = FollowUpStatus::Submitted;
        holder.details().update_batch(vec![held]).await?;
        holder.commit().await?;

        assert_eq!(waiter.await??, Some(FollowUpStatus::Submitted));

        let session = repos.begin().await?;
        session.periods().delete_batch(&[period.id]).await?;
        session.commit().await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_period_lock_keeps_list_order() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let period = create_test_period(2032, "9202", "LOCK-002");
        let finding = create_test_finding(&period, "920201200100");

        let session = repos.begin().await?;
        session.periods().create_batch(vec![period.clone()]).await?;
        session.findings().create_batch(vec![finding.clone()]).await?;
        session
            .details()
            .create_batch(vec![
                create_test_detail(&finding, 20, "A-1"),
                create_test_detail(&finding, 10, "B-1"),
                create_test_detail(&finding, 10, "A-1"),
            ])
            .await?;

        let locked = session.details().list_by_period_for_update(period.id).await?;
        let plain = session.details().list_by_period(period.id).await?;
        let ids = |rows: &[FlagDetailModel]| rows.iter().map(|d| d.id).collect::<Vec<_>>();
        assert_eq!(ids(&locked), ids(&plain));
        assert_eq!(locked.len(), 3);
        session.rollback().await?;
        Ok(())
    }
}
