use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::RepositoryResult;
use super::pagination::{Page, PageRequest};
use super::{CreateBatch, DeleteBatch, FindById, LoadBatch, UpdateBatch};
use crate::models::{AtensiPeriodModel, PeriodFilter};

/// Storage of audit periods (cacm_atensi).
///
/// `delete_batch` removes the period's findings and flag details as well.
#[async_trait]
pub trait AtensiPeriodRepository:
    FindById<AtensiPeriodModel>
    + LoadBatch<AtensiPeriodModel>
    + CreateBatch<AtensiPeriodModel>
    + UpdateBatch<AtensiPeriodModel>
    + DeleteBatch
    + Send
    + Sync
{
    async fn find_by_natural_key(
        &self,
        fiscal_year: i32,
        region_code: &str,
        period_number: &str,
    ) -> RepositoryResult<Option<AtensiPeriodModel>>;

    /// Load the period and hold a row lock until the session ends.
    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>>;

    /// Set `is_sent` if and only if it is still false.
    ///
    /// Returns false when another session sealed the period first.
    async fn mark_sent(&self, id: Uuid, actor: &str, at: DateTime<Utc>) -> RepositoryResult<bool>;

    /// Periods of one scope, newest raised date first.
    async fn list(
        &self,
        fiscal_year: i32,
        region_code: &str,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<AtensiPeriodModel>>;
}
