use async_trait::async_trait;
use cacm_desa_db::models::FlagDetailModel;
use cacm_desa_db::repository::{CreateBatch, RepositoryError, RepositoryResult};

use super::repo_impl::FlagDetailRepositoryImpl;

#[async_trait]
impl CreateBatch<FlagDetailModel> for FlagDetailRepositoryImpl {
    async fn create_batch(&self, items: Vec<FlagDetailModel>) -> RepositoryResult<Vec<FlagDetailModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO cacm_atensi_desa_rinc (
                    id, atensi_desa_id, atensi_id, tahun, kd_pemda, no_atensi, kd_desa,
                    jns_atensi, no_bukti, tgl_bukti, ket_bukti, tgl_std, tgl_real, tgl_dif,
                    nilai_std, nilai_real, nilai_prc, nilai_dif, is_redflag,
                    status_tl, status_ver, nama_tl, komen_tl, nama_file, update_by, update_at
                )
                VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
                )
                "#,
            )
            .bind(item.id)
            .bind(item.finding_id)
            .bind(item.period_id)
            .bind(item.fiscal_year)
            .bind(item.region_code.as_str())
            .bind(item.period_number.as_str())
            .bind(item.village_code.as_str())
            .bind(item.flag_type_code)
            .bind(item.evidence_number.as_str())
            .bind(item.evidence_date)
            .bind(item.evidence_description.as_deref())
            .bind(item.standard_date)
            .bind(item.actual_date)
            .bind(item.date_difference)
            .bind(item.standard_value)
            .bind(item.actual_value)
            .bind(item.percentage)
            .bind(item.difference)
            .bind(item.is_red_flag)
            .bind(item.follow_up_status.code())
            .bind(item.verification_status.code())
            .bind(item.responder_name.as_deref())
            .bind(item.responder_comment.as_deref())
            .bind(item.attached_file_name.as_deref())
            .bind(item.updated_by.as_deref())
            .bind(item.updated_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use cacm_desa_db::repository::{CreateBatch, FlagDetailRepository, RepositoryError};
    use serial_test::serial;

    use super::super::test_utils::test_utils::create_test_detail;
    use crate::repository::atensi::atensi_period_repository::test_utils::test_utils::create_test_period;
    use crate::repository::atensi::village_finding_repository::test_utils::test_utils::create_test_finding;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_evidence_number_unique_per_flag_type() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "RINC-001")])
            .await?
            .remove(0);
        let finding = create_test_finding(&period, "123401200100");
        repos.finding_repository.create_batch(vec![finding.clone()]).await?;

        repos
            .detail_repository
            .create_batch(vec![
                create_test_detail(&finding, 10, "BKT-1"),
                create_test_detail(&finding, 20, "BKT-1"),
            ])
            .await?;

        let duplicate = repos
            .detail_repository
            .create_batch(vec![create_test_detail(&finding, 10, "BKT-1")])
            .await;
        assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    #[serial]
    async fn test_find_by_natural_key() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let period = repos
            .period_repository
            .create_batch(vec![create_test_period(2025, "1234", "RINC-002")])
            .await?
            .remove(0);
        let finding = create_test_finding(&period, "123401200100");
        repos.finding_repository.create_batch(vec![finding.clone()]).await?;
        let detail = create_test_detail(&finding, 30, "BKT-9");
        repos.detail_repository.create_batch(vec![detail.clone()]).await?;

        let found = repos
            .detail_repository
            .find_by_natural_key(finding.id, 30, "BKT-9")
            .await?;
        assert_eq!(found.map(|d| d.id), Some(detail.id));
        assert!(repos
            .detail_repository
            .find_by_natural_key(finding.id, 10, "BKT-9")
            .await?
            .is_none());
        Ok(())
    }
}
