//! Request bodies accepted by the workflow endpoints.
//!
//! Field names are camelCase on the wire. Every struct derives [`Validate`];
//! handlers call `validate()` before touching the store so that a bad input
//! is reported with the offending field name.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub fn validate_four_digit_year(value: &str) -> Result<(), ValidationError> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("four_digit_year");
        err.message = Some("expected a 4-digit year".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(range(min = 2020, max = 2030, message = "fiscal year out of range"))]
    pub fiscal_year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MobileLoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(custom(function = "validate_four_digit_year"))]
    pub fiscal_year: String,
    #[validate(length(min = 1, max = 4, message = "region code must be 1 to 4 characters"))]
    pub region_code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SwitchFiscalYearRequest {
    #[validate(range(min = 2020, max = 2030, message = "fiscal year out of range"))]
    pub fiscal_year: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePeriodRequest {
    #[validate(length(min = 1, max = 30, message = "period number must be 1 to 30 characters"))]
    pub period_number: String,
    #[validate(required(message = "raised date is required"))]
    pub raised_date: Option<NaiveDate>,
    #[validate(required(message = "cut-off date is required"))]
    pub cutoff_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Partial update; absent fields are left untouched, an empty note clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePeriodRequest {
    #[validate(length(min = 1, max = 30, message = "period number must be 1 to 30 characters"))]
    pub period_number: Option<String>,
    pub raised_date: Option<NaiveDate>,
    pub cutoff_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PeriodListQuery {
    pub q: Option<String>,
    pub is_sent: Option<bool>,
    #[validate(range(min = 1, message = "page starts at 1"))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 500, message = "page size must be 1 to 500"))]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    #[validate(length(min = 1, message = "select at least one flag type"))]
    pub selected_flag_type_codes: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    pub as_of_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[validate(length(min = 1, max = 30, message = "period number must be 1 to 30 characters"))]
    pub period_number: String,
    #[validate(required(message = "raised date is required"))]
    pub raised_date: Option<NaiveDate>,
    #[validate(required(message = "cut-off date is required"))]
    pub cutoff_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Manual documentation of one anomaly instance.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlagDetailRequest {
    pub flag_type_code: i32,
    #[validate(length(min = 1, max = 50, message = "evidence number must be 1 to 50 characters"))]
    pub evidence_number: String,
    pub evidence_date: Option<NaiveDate>,
    pub evidence_description: Option<String>,
    pub standard_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub date_difference: Option<i32>,
    pub standard_value: Option<Decimal>,
    pub actual_value: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub difference: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_red_flag: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailStatusRequest {
    pub follow_up_status: Option<i16>,
    pub verification_status: Option<i16>,
}

/// Remediation submitted by a village for one flagged item.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[validate(length(max = 100, message = "responder name is at most 100 characters"))]
    pub responder_name: Option<String>,
    #[validate(length(max = 4000, message = "comment is at most 4000 characters"))]
    pub responder_comment: Option<String>,
    #[validate(length(max = 255, message = "file name is at most 255 characters"))]
    pub attached_file_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn mobile_login_requires_four_digit_year() {
        let req = MobileLoginRequest {
            username: "operator".into(),
            password: "secret".into(),
            fiscal_year: "25".into(),
            region_code: "3201".into(),
        };
        let err: ApiError = req.validate().unwrap_err().into();
        assert_eq!(
            err,
            ApiError::ValidationError {
                field: "fiscal_year".into(),
                message: "expected a 4-digit year".into()
            }
        );

        let ok = MobileLoginRequest {
            fiscal_year: "2025".into(),
            ..req
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn create_period_requires_both_dates() {
        let req: CreatePeriodRequest = serde_json::from_str(
            r#"{"periodNumber":"001","raisedDate":"2025-01-10"}"#,
        )
        .unwrap();
        let err: ApiError = req.validate().unwrap_err().into();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "cutoff_date"));
    }

    #[test]
    fn dispatch_selection_must_not_be_empty() {
        let req: DispatchRequest = serde_json::from_str(r#"{"selectedFlagTypeCodes":[]}"#).unwrap();
        assert!(req.validate().is_err());

        let req: DispatchRequest = serde_json::from_str(r#"{"selectedFlagTypeCodes":[10,20]}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
