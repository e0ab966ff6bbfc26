use cacm_desa_db::models::{FollowUpStatus, VillageFindingModel};
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::VillageFindingRepositoryImpl;
use crate::utils::TryFromRow;

impl VillageFindingRepositoryImpl {
    pub(super) async fn list_by_period_impl(&self, period_id: Uuid) -> RepositoryResult<Vec<VillageFindingModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa WHERE atensi_id = $1 ORDER BY kd_desa")
                .bind(period_id)
                .fetch_all(&mut **transaction)
                .await?
        };
        rows.iter().map(VillageFindingModel::try_from_row).collect()
    }

    pub(super) async fn list_by_village_impl(
        &self,
        fiscal_year: i32,
        village_code: &str,
        status: FollowUpStatus,
    ) -> RepositoryResult<Vec<VillageFindingModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT d.* FROM cacm_atensi_desa d
                JOIN cacm_atensi a ON a.id = d.atensi_id
                WHERE d.tahun = $1 AND d.kd_desa = $2 AND d.status_tl = $3
                ORDER BY a.tgl_atensi DESC, d.no_atensi DESC
                "#,
            )
            .bind(fiscal_year)
            .bind(village_code)
            .bind(status.code())
            .fetch_all(&mut **transaction)
            .await?
        };
        rows.iter().map(VillageFindingModel::try_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::models::{FollowUpStatus, VerificationStatus};
    use cacm_desa_db::repository::{CreateBatch, VillageFindingRepository};
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_finding;
    use crate::repository::atensi::atensi_period_repository::test_utils::test_utils::create_test_period;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_list_by_village_filters_status() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "VIL-001")])
            .await?
            .remove(0);

        let mut sent = create_test_finding(&period, "123401200100");
        sent.follow_up_status = FollowUpStatus::SentToVillage;
        sent.verification_status = VerificationStatus::Pending;
        let untouched = create_test_finding(&period, "123401200200");
        repos.finding_repository.create_batch(vec![sent.clone(), untouched]).await?;

        let listed = repos
            .finding_repository
            .list_by_village(2025, "123401200100", FollowUpStatus::SentToVillage)
            .await?;
        assert_eq!(listed, vec![sent]);

        let by_period = repos.finding_repository.list_by_period(period.id).await?;
        assert_eq!(by_period.len(), 2);
        assert_eq!(by_period[0].village_code.as_str(), "123401200100");
        Ok(())
    }
}
