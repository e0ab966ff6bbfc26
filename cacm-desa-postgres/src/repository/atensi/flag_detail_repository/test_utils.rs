#[cfg(test)]
pub mod test_utils {
    use cacm_desa_db::models::{FlagDetailModel, FollowUpStatus, VerificationStatus, VillageFindingModel};
    use heapless::String as HeaplessString;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    pub fn create_test_detail(
        finding: &VillageFindingModel,
        flag_type_code: i32,
        evidence_number: &str,
    ) -> FlagDetailModel {
        FlagDetailModel {
            id: Uuid::new_v4(),
            finding_id: finding.id,
            period_id: finding.period_id,
            fiscal_year: finding.fiscal_year,
            region_code: finding.region_code.clone(),
            period_number: finding.period_number.clone(),
            village_code: finding.village_code.clone(),
            flag_type_code,
            evidence_number: HeaplessString::try_from(evidence_number).unwrap(),
            evidence_date: None,
            evidence_description: Some("belanja tanpa SPJ".to_string()),
            standard_date: None,
            actual_date: None,
            date_difference: None,
            standard_value: Some(Decimal::new(1_000_000, 2)),
            actual_value: Some(Decimal::new(1_250_000, 2)),
            percentage: None,
            difference: Some(Decimal::new(250_000, 2)),
            is_red_flag: true,
            follow_up_status: FollowUpStatus::New,
            verification_status: VerificationStatus::Pending,
            responder_name: None,
            responder_comment: None,
            attached_file_name: None,
            updated_by: None,
            updated_at: None,
        }
    }
}
