use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{FollowUpStatus, VerificationStatus};
use crate::models::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// - One status change of a flag detail. Rows are appended, never updated.
/// - `hash` covers every field of the row with `hash` itself set to 0.
/// - `antecedent_hash` is the `hash` of the previous row of the same detail,
///   or 0 for the first row, so a detail's history forms a verifiable chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransitionModel {
    pub id: Uuid,
    pub detail_id: Uuid,
    pub actor: String,
    pub from_status: FollowUpStatus,
    pub to_status: FollowUpStatus,
    pub verification_status: VerificationStatus,
    pub recorded_at: DateTime<Utc>,
    pub antecedent_hash: i64,
    pub hash: i64,
}

/// A transition that has not been chained yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatusTransition {
    pub detail_id: Uuid,
    pub actor: String,
    pub from_status: FollowUpStatus,
    pub to_status: FollowUpStatus,
    pub verification_status: VerificationStatus,
    pub recorded_at: DateTime<Utc>,
}

impl StatusTransitionModel {
    /// Seal a new transition onto the chain ending in `antecedent_hash`.
    pub fn chained(entry: NewStatusTransition, antecedent_hash: i64) -> Result<Self, String> {
        let mut model = Self {
            id: Uuid::new_v4(),
            detail_id: entry.detail_id,
            actor: entry.actor,
            from_status: entry.from_status,
            to_status: entry.to_status,
            verification_status: entry.verification_status,
            recorded_at: entry.recorded_at,
            antecedent_hash,
            hash: 0,
        };
        model.hash = model.compute_hash()?;
        Ok(model)
    }

    pub fn compute_hash(&self) -> Result<i64, String> {
        let mut copy = self.clone();
        copy.hash = 0;
        hash_as_i64(&copy)
    }
}

/// True when every row hashes to its stored value and links to its predecessor.
pub fn verify_chain(entries: &[StatusTransitionModel]) -> bool {
    let mut antecedent = 0;
    for entry in entries {
        if entry.antecedent_hash != antecedent {
            return false;
        }
        match entry.compute_hash() {
            Ok(hash) if hash == entry.hash => antecedent = entry.hash,
            _ => return false,
        }
    }
    true
}

impl Identifiable for StatusTransitionModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
