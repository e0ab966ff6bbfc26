use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use super::{CreateBatch, FindById, UpdateBatch};
use crate::models::{FollowUpStatus, VillageFindingModel};

/// Storage of per-village rollups (cacm_atensi_desa).
#[async_trait]
pub trait VillageFindingRepository:
    FindById<VillageFindingModel>
    + CreateBatch<VillageFindingModel>
    + UpdateBatch<VillageFindingModel>
    + Send
    + Sync
{
    async fn find_by_village(
        &self,
        period_id: Uuid,
        village_code: &str,
    ) -> RepositoryResult<Option<VillageFindingModel>>;

    /// Findings of a period ordered by village code.
    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<VillageFindingModel>>;

    /// Findings of one village in one fiscal year with the given follow-up
    /// status, newest period first.
    async fn list_by_village(
        &self,
        fiscal_year: i32,
        village_code: &str,
        status: FollowUpStatus,
    ) -> RepositoryResult<Vec<VillageFindingModel>>;

    /// Add to the counters in place; the deltas may be zero.
    async fn increment_counters(
        &self,
        id: Uuid,
        flag_delta: i32,
        resolved_delta: i32,
    ) -> RepositoryResult<()>;
}
