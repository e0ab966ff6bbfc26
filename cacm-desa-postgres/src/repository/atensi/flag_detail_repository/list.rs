use cacm_desa_db::models::{FlagDetailModel, FollowUpStatus};
use cacm_desa_db::repository::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::FlagDetailRepositoryImpl;
use crate::utils::TryFromRow;

impl FlagDetailRepositoryImpl {
    pub(super) async fn list_by_period_impl(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_atensi_desa_rinc
                WHERE atensi_id = $1
                ORDER BY kd_desa, jns_atensi, no_bukti
                "#,
            )
            .bind(period_id)
            .fetch_all(&mut **transaction)
            .await?
        };
        rows.iter().map(FlagDetailModel::try_from_row).collect()
    }

    pub(super) async fn list_by_finding_impl(&self, finding_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_atensi_desa_rinc
                WHERE atensi_desa_id = $1
                ORDER BY jns_atensi, no_bukti
                "#,
            )
            .bind(finding_id)
            .fetch_all(&mut **transaction)
            .await?
        };
        rows.iter().map(FlagDetailModel::try_from_row).collect()
    }

    pub(super) async fn list_by_village_statuses_impl(
        &self,
        fiscal_year: i32,
        village_code: &str,
        statuses: &[FollowUpStatus],
    ) -> RepositoryResult<Vec<FlagDetailModel>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let codes: Vec<i16> = statuses.iter().map(|s| s.code()).collect();

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_atensi_desa_rinc
                WHERE tahun = $1 AND kd_desa = $2 AND status_tl = ANY($3)
                ORDER BY no_atensi, jns_atensi, no_bukti
                "#,
            )
            .bind(fiscal_year)
            .bind(village_code)
            .bind(&codes)
            .fetch_all(&mut **transaction)
            .await?
        };
        rows.iter().map(FlagDetailModel::try_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::models::FollowUpStatus;
    use cacm_desa_db::repository::{CreateBatch, FlagDetailRepository};
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_detail;
    use crate::repository::atensi::atensi_period_repository::test_utils::test_utils::create_test_period;
    use crate::repository::atensi::village_finding_repository::test_utils::test_utils::create_test_finding;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_lists_are_ordered_and_filtered() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "ORD-001")])
            .await?
            .remove(0);
        let finding = create_test_finding(&period, "123401200100");
        repos.finding_repository.create_batch(vec![finding.clone()]).await?;

        let mut done = create_test_detail(&finding, 20, "A-1");
        done.follow_up_status = FollowUpStatus::Submitted;
        repos
            .detail_repository
            .create_batch(vec![
                done.clone(),
                create_test_detail(&finding, 10, "B-1"),
                create_test_detail(&finding, 10, "A-1"),
            ])
            .await?;

        let listed = repos.detail_repository.list_by_finding(finding.id).await?;
        let keys: Vec<(i32, &str)> = listed
            .iter()
            .map(|d| (d.flag_type_code, d.evidence_number.as_str()))
            .collect();
        assert_eq!(keys, vec![(10, "A-1"), (10, "B-1"), (20, "A-1")]);

        let completed = repos
            .detail_repository
            .list_by_village_statuses(
                2025,
                "123401200100",
                &[FollowUpStatus::Resolved, FollowUpStatus::Submitted],
            )
            .await?;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done.id);
        Ok(())
    }
}
