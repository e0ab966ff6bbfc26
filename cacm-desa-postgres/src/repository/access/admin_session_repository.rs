use async_trait::async_trait;
use cacm_desa_db::models::AdminSessionModel;
use cacm_desa_db::repository::{AdminSessionRepository, CreateBatch, RepositoryError, RepositoryResult};
use uuid::Uuid;

use postgres_unit_of_work::Executor;

pub struct AdminSessionRepositoryImpl {
    pub executor: Executor,
}

impl AdminSessionRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl CreateBatch<AdminSessionModel> for AdminSessionRepositoryImpl {
    async fn create_batch(&self, items: Vec<AdminSessionModel>) -> RepositoryResult<Vec<AdminSessionModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        for item in &items {
            sqlx::query(
                "INSERT INTO cacm_session (id, user_id, tahun, created_at, expires_at) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(item.id)
            .bind(item.user_id)
            .bind(item.fiscal_year)
            .bind(item.created_at)
            .bind(item.expires_at)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}

#[async_trait]
impl AdminSessionRepository for AdminSessionRepositoryImpl {
    async fn update_fiscal_year(&self, session_id: Uuid, fiscal_year: i32) -> RepositoryResult<bool> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        let result = sqlx::query("UPDATE cacm_session SET tahun = $2 WHERE id = $1")
            .bind(session_id)
            .bind(fiscal_year)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
