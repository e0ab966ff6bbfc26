//! Calls into the legacy database routines.
//!
//! Each call runs on its own pooled connection outside any session
//! transaction; the routines manage their own writes.

use async_trait::async_trait;
use cacm_desa_db::repository::{
    DocumentationCall, LegacyLoginCall, LegacyLoginProcedure, RedFlagProcedures, RepositoryResult,
};
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Date layout the documentation routine parses with `to_date(.., 'YYYYMMDD')`.
const PROCEDURE_DATE_FORMAT: &str = "%Y%m%d";

pub fn procedure_date(date: NaiveDate) -> String {
    date.format(PROCEDURE_DATE_FORMAT).to_string()
}

#[derive(Clone)]
pub struct PostgresProcedures {
    pool: Arc<PgPool>,
}

impl PostgresProcedures {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedFlagProcedures for PostgresProcedures {
    async fn check_red_flags(&self, as_of: NaiveDate) -> RepositoryResult<()> {
        tracing::debug!(%as_of, "calling sp_cek_redflags");
        sqlx::query("SELECT sp_cek_redflags($1)")
            .bind(as_of)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn archive_red_flags(&self) -> RepositoryResult<()> {
        tracing::debug!("calling sp_arsipkan_redflags");
        sqlx::query("SELECT sp_arsipkan_redflags()")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn document_red_flags(&self, call: &DocumentationCall) -> RepositoryResult<()> {
        tracing::debug!(
            fiscal_year = call.fiscal_year,
            region_code = %call.region_code,
            period_number = %call.period_number,
            "calling sp_cacm_redflag_dokumentasi"
        );
        sqlx::query("SELECT sp_cacm_redflag_dokumentasi($1, $2, $3, $4, $5, $6, $7)")
            .bind(call.fiscal_year)
            .bind(&call.region_code)
            .bind(procedure_date(call.cutoff_date))
            .bind(&call.period_number)
            .bind(procedure_date(call.raised_date))
            .bind(call.note.as_deref())
            .bind(&call.actor)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn refresh_follow_up(&self, village_code: &str, fiscal_year: i32) -> RepositoryResult<()> {
        sqlx::query("SELECT sp_refresh_tl($1, $2)")
            .bind(village_code)
            .bind(fiscal_year)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LegacyLoginProcedure for PostgresProcedures {
    async fn login_user_siskeudes(&self, call: &LegacyLoginCall) -> RepositoryResult<Option<String>> {
        let row = sqlx::query("SELECT result FROM sp_login_usersiskeudes($1, $2, $3, $4, $5, $6)")
            .bind(&call.fiscal_year)
            .bind(&call.region_code)
            .bind(&call.username)
            .bind(&call.password)
            .bind(&call.user_key)
            .bind(&call.password_key)
            .fetch_optional(self.pool.as_ref())
            .await?;
        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("result")?),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_passed_as_compact_strings() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(procedure_date(date), "20250307");
    }
}
