use cacm_desa_api::domain::{PeriodNumber, RegionCode, VillageCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{FollowUpStatus, VerificationStatus};
use crate::models::Identifiable;

/// # Documentation
/// - Rollup of the red flags of one village within one period.
/// - Natural key: (fiscal_year, region_code, period_number, village_code).
/// - `flag_count` and `resolved_count` are additive counters. They are bumped
///   when a detail is created or reaches the terminal follow-up code and are
///   never recomputed from the child rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageFindingModel {
    pub id: Uuid,
    pub period_id: Uuid,
    pub fiscal_year: i32,
    pub region_code: RegionCode,
    pub period_number: PeriodNumber,
    pub village_code: VillageCode,
    pub flag_count: i32,
    pub resolved_count: i32,
    pub follow_up_status: FollowUpStatus,
    pub verification_status: VerificationStatus,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for VillageFindingModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
