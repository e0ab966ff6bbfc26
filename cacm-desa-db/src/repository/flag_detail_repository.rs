use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use super::{CreateBatch, FindById, UpdateBatch};
use crate::models::{FlagDetailModel, FollowUpStatus};

/// Storage of flag details (cacm_atensi_desa_rinc).
#[async_trait]
pub trait FlagDetailRepository:
    FindById<FlagDetailModel>
    + CreateBatch<FlagDetailModel>
    + UpdateBatch<FlagDetailModel>
    + Send
    + Sync
{
    async fn find_by_natural_key(
        &self,
        finding_id: Uuid,
        flag_type_code: i32,
        evidence_number: &str,
    ) -> RepositoryResult<Option<FlagDetailModel>>;

    /// Every detail of a period, ordered by village, flag type and evidence number.
    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>>;

    /// Load the detail and hold a row lock until the session ends.
    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>>;

    /// `list_by_period` with every returned row locked until the session ends.
    async fn list_by_period_for_update(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>>;

    /// Details of one finding ordered by flag type and evidence number.
    async fn list_by_finding(&self, finding_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>>;

    /// Details of one village in one fiscal year whose follow-up status is in `statuses`.
    async fn list_by_village_statuses(
        &self,
        fiscal_year: i32,
        village_code: &str,
        statuses: &[FollowUpStatus],
    ) -> RepositoryResult<Vec<FlagDetailModel>>;

    /// Distinct flag type codes present in a period, ascending.
    async fn distinct_flag_types(&self, period_id: Uuid) -> RepositoryResult<Vec<i32>>;
}
