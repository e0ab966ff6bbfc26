use async_trait::async_trait;
use cacm_desa_db::repository::{RepositoryError, RepositoryResult, VillageRepository};
use sqlx::Row;
use std::collections::HashMap;

use postgres_unit_of_work::Executor;

pub struct VillageRepositoryImpl {
    pub executor: Executor,
}

impl VillageRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl VillageRepository for VillageRepositoryImpl {
    async fn load_names(&self, village_codes: &[String]) -> RepositoryResult<HashMap<String, String>> {
        if village_codes.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT kd_desa, nama_desa FROM ref_desa WHERE kd_desa = ANY($1)")
                .bind(village_codes)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut names = HashMap::with_capacity(rows.len());
        for row in rows {
            names.insert(row.try_get("kd_desa")?, row.try_get("nama_desa")?);
        }
        Ok(names)
    }
}
