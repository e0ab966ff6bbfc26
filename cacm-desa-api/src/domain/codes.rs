use heapless::String as HeaplessString;
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};

/// Leading part of a tenant code that identifies the parent region (Kd_Pemda).
pub const REGION_CODE_LEN: usize = 4;
/// Village code (Kd_Desa), varchar(12) in the legacy schema.
pub const VILLAGE_CODE_LEN: usize = 12;
pub const PERIOD_NUMBER_LEN: usize = 30;
pub const EVIDENCE_NUMBER_LEN: usize = 50;

pub type RegionCode = HeaplessString<REGION_CODE_LEN>;
pub type VillageCode = HeaplessString<VILLAGE_CODE_LEN>;
pub type PeriodNumber = HeaplessString<PERIOD_NUMBER_LEN>;
pub type EvidenceNumber = HeaplessString<EVIDENCE_NUMBER_LEN>;

/// Parse a trimmed, non-empty code into a fixed-capacity string.
pub fn parse_code<const N: usize>(field: &str, value: &str) -> ApiResult<HeaplessString<N>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    HeaplessString::from_str(trimmed)
        .map_err(|_| ApiError::validation(field, format!("must be at most {N} characters")))
}

/// True when `value` is exactly twelve ASCII digits.
pub fn is_village_code(value: &str) -> bool {
    value.len() == VILLAGE_CODE_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
