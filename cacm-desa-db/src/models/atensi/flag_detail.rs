use cacm_desa_api::domain::{EvidenceNumber, PeriodNumber, RegionCode, VillageCode};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{FollowUpStatus, VerificationStatus};
use crate::models::Identifiable;

/// # Documentation
/// - One concrete anomaly tied to one evidence item (Bukti) of a village.
/// - Natural key: (fiscal_year, region_code, period_number, village_code,
///   flag_type_code, evidence_number); the evidence number is unique within
///   (period, village, flag type).
/// - Created by the archive procedure or by the documentation API. Never
///   deleted on its own, only through the owning period.
/// - Status changes are recorded in `cacm_atensi_desa_rinc_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDetailModel {
    pub id: Uuid,
    pub finding_id: Uuid,
    pub period_id: Uuid,
    pub fiscal_year: i32,
    pub region_code: RegionCode,
    pub period_number: PeriodNumber,
    pub village_code: VillageCode,
    pub flag_type_code: i32,
    pub evidence_number: EvidenceNumber,
    pub evidence_date: Option<NaiveDate>,
    pub evidence_description: Option<String>,
    pub standard_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub date_difference: Option<i32>,
    pub standard_value: Option<Decimal>,
    pub actual_value: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub difference: Option<Decimal>,
    pub is_red_flag: bool,
    pub follow_up_status: FollowUpStatus,
    pub verification_status: VerificationStatus,
    pub responder_name: Option<String>,
    pub responder_comment: Option<String>,
    pub attached_file_name: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for FlagDetailModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Remediation fields of one detail as shown to the village.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationView {
    pub detail_id: Uuid,
    pub follow_up_status: FollowUpStatus,
    pub verification_status: VerificationStatus,
    pub responder_name: Option<String>,
    pub responder_comment: Option<String>,
    pub attached_file_name: Option<String>,
}

impl From<&FlagDetailModel> for RemediationView {
    fn from(detail: &FlagDetailModel) -> Self {
        Self {
            detail_id: detail.id,
            follow_up_status: detail.follow_up_status,
            verification_status: detail.verification_status,
            responder_name: detail.responder_name.clone(),
            responder_comment: detail.responder_comment.clone(),
            attached_file_name: detail.attached_file_name.clone(),
        }
    }
}
