use async_trait::async_trait;
use cacm_desa_db::models::StatusTransitionModel;
use cacm_desa_db::repository::{CreateBatch, RepositoryError, RepositoryResult, StatusHistoryRepository};
use sqlx::{postgres::PgRow, Row};
use std::collections::HashMap;
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::{get_follow_up_status, get_verification_status, TryFromRow};

pub struct StatusHistoryRepositoryImpl {
    pub executor: Executor,
}

impl StatusHistoryRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl CreateBatch<StatusTransitionModel> for StatusHistoryRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<StatusTransitionModel>,
    ) -> RepositoryResult<Vec<StatusTransitionModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO cacm_atensi_desa_rinc_history (
                    id, rinc_id, actor, from_status, to_status, status_ver,
                    recorded_at, antecedent_hash, hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(item.detail_id)
            .bind(item.actor.as_str())
            .bind(item.from_status.code())
            .bind(item.to_status.code())
            .bind(item.verification_status.code())
            .bind(item.recorded_at)
            .bind(item.antecedent_hash)
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl StatusHistoryRepository for StatusHistoryRepositoryImpl {
    async fn latest_hashes(&self, detail_ids: &[Uuid]) -> RepositoryResult<HashMap<Uuid, i64>> {
        if detail_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT DISTINCT ON (rinc_id) rinc_id, hash
                FROM cacm_atensi_desa_rinc_history
                WHERE rinc_id = ANY($1)
                ORDER BY rinc_id, seq DESC
                "#,
            )
            .bind(detail_ids)
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut hashes = HashMap::with_capacity(rows.len());
        for row in rows {
            hashes.insert(row.try_get("rinc_id")?, row.try_get("hash")?);
        }
        Ok(hashes)
    }

    async fn list_by_detail(&self, detail_id: Uuid) -> RepositoryResult<Vec<StatusTransitionModel>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query("SELECT * FROM cacm_atensi_desa_rinc_history WHERE rinc_id = $1 ORDER BY seq")
                .bind(detail_id)
                .fetch_all(&mut **transaction)
                .await?
        };
        rows.iter().map(StatusTransitionModel::try_from_row).collect()
    }
}

impl TryFromRow<PgRow> for StatusTransitionModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(StatusTransitionModel {
            id: row.try_get("id")?,
            detail_id: row.try_get("rinc_id")?,
            actor: row.try_get("actor")?,
            from_status: get_follow_up_status(row, "from_status")?,
            to_status: get_follow_up_status(row, "to_status")?,
            verification_status: get_verification_status(row, "status_ver")?,
            recorded_at: row.try_get("recorded_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            hash: row.try_get("hash")?,
        })
    }
}
