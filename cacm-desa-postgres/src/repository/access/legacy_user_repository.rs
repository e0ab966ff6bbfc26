use async_trait::async_trait;
use cacm_desa_db::models::LegacyUserModel;
use cacm_desa_db::repository::{LegacyUserRepository, RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::TryFromRow;

/// Raw-SQL access to the user, role and tenant tables.
pub struct LegacyUserRepositoryImpl {
    pub executor: Executor,
}

impl LegacyUserRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl LegacyUserRepository for LegacyUserRepositoryImpl {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<LegacyUserModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(
                r#"
                SELECT u.id, u.username, u.nama, u.password_hash, u.is_active, u.last_login,
                       r.nama AS role_name, r.kode AS role_code, r.permissions,
                       p.id AS tenant_id, p.nama_pemda AS tenant_name
                FROM cacm_user u
                JOIN cacm_peran r ON r.id = u.peran_id
                LEFT JOIN cacm_pemda p ON p.id = u.pemda_id
                WHERE u.username = $1
                "#,
            )
            .bind(username)
            .fetch_optional(&mut **transaction)
            .await?
        };
        row.as_ref().map(LegacyUserModel::try_from_row).transpose()
    }

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> RepositoryResult<()> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        sqlx::query("UPDATE cacm_user SET last_login = $2 WHERE id = $1")
            .bind(user_id)
            .bind(at)
            .execute(&mut **transaction)
            .await?;
        Ok(())
    }
}

impl TryFromRow<PgRow> for LegacyUserModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(LegacyUserModel {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            name: row.try_get("nama")?,
            password_hash: row.try_get("password_hash")?,
            active: row.try_get("is_active")?,
            role_name: row.try_get("role_name")?,
            role_code: row.try_get("role_code")?,
            permissions_json: row.try_get("permissions")?,
            tenant_id: row.try_get("tenant_id")?,
            tenant_name: row.try_get("tenant_name")?,
            last_login: row.try_get("last_login")?,
        })
    }
}
