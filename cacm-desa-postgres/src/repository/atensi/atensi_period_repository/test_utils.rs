#[cfg(test)]
pub mod test_utils {
    use cacm_desa_db::models::AtensiPeriodModel;
    use chrono::NaiveDate;
    use heapless::String as HeaplessString;
    use uuid::Uuid;

    pub fn create_test_period(fiscal_year: i32, region_code: &str, period_number: &str) -> AtensiPeriodModel {
        AtensiPeriodModel {
            id: Uuid::new_v4(),
            fiscal_year,
            region_code: HeaplessString::try_from(region_code).unwrap(),
            period_number: HeaplessString::try_from(period_number).unwrap(),
            raised_date: NaiveDate::from_ymd_opt(fiscal_year, 1, 10).unwrap(),
            cutoff_date: NaiveDate::from_ymd_opt(fiscal_year, 1, 5).unwrap(),
            note: Some("test period".to_string()),
            village_count: 0,
            flag_count: 0,
            resolved_count: 0,
            is_sent: false,
            created_by: Some("test".to_string()),
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }
}
