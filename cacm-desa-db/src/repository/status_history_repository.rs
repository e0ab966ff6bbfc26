use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::error::RepositoryResult;
use super::CreateBatch;
use crate::models::StatusTransitionModel;

/// Append-only status history (cacm_atensi_desa_rinc_history).
///
/// Only inserts are offered; rows are never updated or deleted on their own.
#[async_trait]
pub trait StatusHistoryRepository: CreateBatch<StatusTransitionModel> + Send + Sync {
    /// Hash of the newest row for each detail that has history.
    async fn latest_hashes(&self, detail_ids: &[Uuid]) -> RepositoryResult<HashMap<Uuid, i64>>;

    /// History of one detail in the order it was recorded.
    async fn list_by_detail(&self, detail_id: Uuid) -> RepositoryResult<Vec<StatusTransitionModel>>;
}
