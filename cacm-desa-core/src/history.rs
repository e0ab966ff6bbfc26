//! Append-only status history of flag details.

use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_db::models::{
    FlagDetailModel, FollowUpStatus, NewStatusTransition, StatusTransitionModel, VerificationStatus,
};
use cacm_desa_db::repository::CreateBatch;
use cacm_desa_db::unit_of_work::UnitOfWorkSession;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub fn transition(
    detail: &FlagDetailModel,
    actor: &str,
    to_status: FollowUpStatus,
    verification_status: VerificationStatus,
    at: DateTime<Utc>,
) -> NewStatusTransition {
    NewStatusTransition {
        detail_id: detail.id,
        actor: actor.to_string(),
        from_status: detail.follow_up_status,
        to_status,
        verification_status,
        recorded_at: at,
    }
}

/// Chain `entries` onto the current head of each detail's history and
/// store them in the session's transaction.
///
/// Several entries for the same detail are chained in the given order.
pub async fn append_transitions(
    session: &dyn UnitOfWorkSession,
    entries: Vec<NewStatusTransition>,
) -> ApiResult<usize> {
    if entries.is_empty() {
        return Ok(0);
    }

    let mut detail_ids: Vec<Uuid> = entries.iter().map(|e| e.detail_id).collect();
    detail_ids.sort_unstable();
    detail_ids.dedup();
    let mut heads = session.history().latest_hashes(&detail_ids).await?;

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let antecedent = heads.get(&entry.detail_id).copied().unwrap_or(0);
        let row = StatusTransitionModel::chained(entry, antecedent).map_err(ApiError::InternalError)?;
        heads.insert(row.detail_id, row.hash);
        rows.push(row);
    }

    let count = rows.len();
    session.history().create_batch(rows).await?;
    Ok(count)
}
