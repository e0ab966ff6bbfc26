use async_trait::async_trait;
use cacm_desa_db::models::TenantModel;
use cacm_desa_db::repository::{FindById, RepositoryError, RepositoryResult, TenantRepository};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::TryFromRow;

pub struct TenantRepositoryImpl {
    pub executor: Executor,
}

impl TenantRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl FindById<TenantModel> for TenantRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TenantModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT id, kd_pemda, nama_pemda FROM cacm_pemda WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(TenantModel::try_from_row).transpose()
    }
}

impl TenantRepository for TenantRepositoryImpl {}

impl TryFromRow<PgRow> for TenantModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(TenantModel {
            id: row.try_get("id")?,
            code: row.try_get("kd_pemda")?,
            name: row.try_get("nama_pemda")?,
        })
    }
}
