use async_trait::async_trait;
use cacm_desa_db::models::FlagTypeModel;
use cacm_desa_db::repository::{FlagTypeRepository, RepositoryError, RepositoryResult};
use sqlx::{postgres::PgRow, Row};

use postgres_unit_of_work::Executor;
use crate::utils::TryFromRow;

pub struct FlagTypeRepositoryImpl {
    pub executor: Executor,
}

impl FlagTypeRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl FlagTypeRepository for FlagTypeRepositoryImpl {
    async fn load_by_codes(&self, codes: &[i32]) -> RepositoryResult<Vec<FlagTypeModel>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_jns_atensi WHERE jns_atensi = ANY($1) ORDER BY jns_atensi")
                .bind(codes)
                .fetch_all(&mut **transaction)
                .await?
        };
        rows.iter().map(FlagTypeModel::try_from_row).collect()
    }
}

impl TryFromRow<PgRow> for FlagTypeModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(FlagTypeModel {
            code: row.try_get("jns_atensi")?,
            name: row.try_get("nama_atensi")?,
            abbreviation: row.try_get("singkatan")?,
            criteria: row.try_get("kriteria_jns")?,
            unit: row.try_get("satuan")?,
            standard_caption: row.try_get("std_caption")?,
            actual_caption: row.try_get("real_caption")?,
            difference_caption: row.try_get("dif_caption")?,
        })
    }
}
