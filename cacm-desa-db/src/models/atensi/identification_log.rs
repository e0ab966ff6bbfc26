use cacm_desa_api::domain::RegionCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// # Documentation
/// - Written by the detection procedure after each identification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationLogModel {
    pub id: Uuid,
    pub fiscal_year: i32,
    pub region_code: RegionCode,
    pub last_update: DateTime<Utc>,
    pub cutoff_date: NaiveDate,
    pub village_count: i32,
    pub flag_count: i32,
}
