use async_trait::async_trait;
use cacm_desa_db::models::IdentificationLogModel;
use cacm_desa_db::repository::{IdentificationLogRepository, RepositoryError, RepositoryResult};
use sqlx::{postgres::PgRow, Row};

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct IdentificationLogRepositoryImpl {
    pub executor: Executor,
}

impl IdentificationLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl IdentificationLogRepository for IdentificationLogRepositoryImpl {
    async fn latest(
        &self,
        fiscal_year: i32,
        region_code: &str,
    ) -> RepositoryResult<Option<IdentificationLogModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT * FROM cacm_identifikasi_rf
                WHERE tahun = $1 AND kd_pemda = $2
                ORDER BY tgl_lastupdate DESC
                LIMIT 1
                "#,
            )
            .bind(fiscal_year)
            .bind(region_code)
            .fetch_optional(&mut **transaction)
            .await?
        };
        row.as_ref().map(IdentificationLogModel::try_from_row).transpose()
    }
}

impl TryFromRow<PgRow> for IdentificationLogModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(IdentificationLogModel {
            id: row.try_get("id")?,
            fiscal_year: row.try_get("tahun")?,
            region_code: get_heapless_string(row, "kd_pemda")?,
            last_update: row.try_get("tgl_lastupdate")?,
            cutoff_date: row.try_get("tgl_cutoff")?,
            village_count: row.try_get("jlh_desa")?,
            flag_count: row.try_get("jlh_rf")?,
        })
    }
}
