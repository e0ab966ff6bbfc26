use cacm_desa_api::domain::{PeriodNumber, RegionCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One audit cycle (No_Atensi) of a region within a fiscal year.
/// - Natural key: (fiscal_year, region_code, period_number), unique.
/// - `is_sent` flips from false to true once, through the dispatch engine only.
/// - Deleting a period removes its findings and their flag details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtensiPeriodModel {
    pub id: Uuid,
    pub fiscal_year: i32,
    pub region_code: RegionCode,
    pub period_number: PeriodNumber,
    pub raised_date: NaiveDate,
    pub cutoff_date: NaiveDate,
    pub note: Option<String>,
    pub village_count: i32,
    pub flag_count: i32,
    pub resolved_count: i32,
    pub is_sent: bool,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AtensiPeriodModel {
    pub fn natural_key(&self) -> (i32, &str, &str) {
        (
            self.fiscal_year,
            self.region_code.as_str(),
            self.period_number.as_str(),
        )
    }
}

impl Identifiable for AtensiPeriodModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Filter applied when listing the periods of a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    /// Substring of the period number or the note.
    pub q: Option<String>,
    pub is_sent: Option<bool>,
}

impl PeriodFilter {
    pub fn matches(&self, period: &AtensiPeriodModel) -> bool {
        if let Some(is_sent) = self.is_sent {
            if period.is_sent != is_sent {
                return false;
            }
        }
        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            None => true,
            Some(q) => {
                let q = q.to_lowercase();
                period.period_number.to_lowercase().contains(&q)
                    || period
                        .note
                        .as_deref()
                        .is_some_and(|note| note.to_lowercase().contains(&q))
            }
        }
    }
}
