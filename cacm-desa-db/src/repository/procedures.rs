//! Stored procedures owned by the legacy database.
//!
//! Their internal logic is opaque to this service; each call is one-shot and
//! the caller applies its own timeout.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;

/// Arguments of `sp_cacm_redflag_dokumentasi`, in the procedure's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationCall {
    pub fiscal_year: i32,
    pub region_code: String,
    pub cutoff_date: NaiveDate,
    pub period_number: String,
    pub raised_date: NaiveDate,
    pub note: Option<String>,
    pub actor: String,
}

/// Arguments of `sp_login_usersiskeudes`, in the procedure's order.
#[derive(Clone, PartialEq, Eq)]
pub struct LegacyLoginCall {
    pub fiscal_year: String,
    pub region_code: String,
    pub username: String,
    pub password: String,
    pub user_key: String,
    pub password_key: String,
}

impl std::fmt::Debug for LegacyLoginCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyLoginCall")
            .field("fiscal_year", &self.fiscal_year)
            .field("region_code", &self.region_code)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Red-flag detection and archival routines.
#[async_trait]
pub trait RedFlagProcedures: Send + Sync {
    /// `sp_cek_redflags`: recompute flagged transactions as of `as_of`.
    async fn check_red_flags(&self, as_of: NaiveDate) -> RepositoryResult<()>;

    /// `sp_arsipkan_redflags`: snapshot detection results into the detail tables.
    async fn archive_red_flags(&self) -> RepositoryResult<()>;

    /// `sp_cacm_redflag_dokumentasi`: create a period and archive into it.
    async fn document_red_flags(&self, call: &DocumentationCall) -> RepositoryResult<()>;

    /// `sp_refresh_tl`: recompute a village's follow-up state.
    async fn refresh_follow_up(&self, village_code: &str, fiscal_year: i32) -> RepositoryResult<()>;
}

/// Mobile credential check performed by the legacy database.
#[async_trait]
pub trait LegacyLoginProcedure: Send + Sync {
    /// The single `result` column of the first row, if a row came back.
    async fn login_user_siskeudes(&self, call: &LegacyLoginCall) -> RepositoryResult<Option<String>>;
}
