use serde::{Deserialize, Serialize};

/// # Documentation
/// - Catalog entry (Jenis Atensi) describing one category of anomaly.
/// - Read-only for the workflow; maintained outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagTypeModel {
    pub code: i32,
    pub name: String,
    pub abbreviation: Option<String>,
    /// Numeric or criteria classification of the rule.
    pub criteria: Option<String>,
    pub unit: Option<String>,
    pub standard_caption: Option<String>,
    pub actual_caption: Option<String>,
    pub difference_caption: Option<String>,
}

/// A flag type present in a period, with its catalog name when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodFlagType {
    pub code: i32,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}
