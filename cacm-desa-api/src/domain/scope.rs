use chrono::{Datelike, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use super::codes::{RegionCode, REGION_CODE_LEN};

/// Tenant partition every workflow query is filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantScope {
    pub fiscal_year: i32,
    pub region_code: RegionCode,
}

impl TenantScope {
    pub fn new(fiscal_year: i32, region_code: RegionCode) -> Self {
        Self {
            fiscal_year,
            region_code,
        }
    }

    /// Build a scope from a session's declared fiscal year (if any) and the
    /// tenant's stored entity code.
    ///
    /// Returns `None` when the tenant code is blank.
    pub fn from_tenant_code(fiscal_year: Option<i32>, tenant_code: &str) -> Option<Self> {
        let region_code = region_from_tenant_code(tenant_code)?;
        Some(Self::new(
            fiscal_year.unwrap_or_else(current_fiscal_year),
            region_code,
        ))
    }

    pub fn owns(&self, fiscal_year: i32, region_code: &str) -> bool {
        self.fiscal_year == fiscal_year && self.region_code.as_str() == region_code
    }
}

/// The leading four characters of a tenant code identify the parent region,
/// whatever sub-entity the rest of the code names.
pub fn region_from_tenant_code(tenant_code: &str) -> Option<RegionCode> {
    let trimmed = tenant_code.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut region: RegionCode = HeaplessString::new();
    for c in trimmed.chars().take(REGION_CODE_LEN) {
        // a char may be wider than one byte; stop rather than split it
        if region.push(c).is_err() {
            break;
        }
    }
    Some(region)
}

pub fn current_fiscal_year() -> i32 {
    Utc::now().year()
}
