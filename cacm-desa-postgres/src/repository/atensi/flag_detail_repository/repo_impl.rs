use async_trait::async_trait;
use cacm_desa_db::models::{FlagDetailModel, FollowUpStatus};
use cacm_desa_db::repository::{FlagDetailRepository, RepositoryResult};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::{get_follow_up_status, get_heapless_string, get_verification_status, TryFromRow};

pub struct FlagDetailRepositoryImpl {
    pub executor: Executor,
}

impl FlagDetailRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl FlagDetailRepository for FlagDetailRepositoryImpl {
    async fn find_by_natural_key(
        &self,
        finding_id: Uuid,
        flag_type_code: i32,
        evidence_number: &str,
    ) -> RepositoryResult<Option<FlagDetailModel>> {
        self.find_by_natural_key_impl(finding_id, flag_type_code, evidence_number)
            .await
    }

    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        self.list_by_period_impl(period_id).await
    }

    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>> {
        self.find_for_update_impl(id).await
    }

    async fn list_by_period_for_update(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        self.list_by_period_for_update_impl(period_id).await
    }

    async fn list_by_finding(&self, finding_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        self.list_by_finding_impl(finding_id).await
    }

    async fn list_by_village_statuses(
        &self,
        fiscal_year: i32,
        village_code: &str,
        statuses: &[FollowUpStatus],
    ) -> RepositoryResult<Vec<FlagDetailModel>> {
        self.list_by_village_statuses_impl(fiscal_year, village_code, statuses)
            .await
    }

    async fn distinct_flag_types(&self, period_id: Uuid) -> RepositoryResult<Vec<i32>> {
        self.distinct_flag_types_impl(period_id).await
    }
}

impl TryFromRow<PgRow> for FlagDetailModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(FlagDetailModel {
            id: row.try_get("id")?,
            finding_id: row.try_get("atensi_desa_id")?,
            period_id: row.try_get("atensi_id")?,
            fiscal_year: row.try_get("tahun")?,
            region_code: get_heapless_string(row, "kd_pemda")?,
            period_number: get_heapless_string(row, "no_atensi")?,
            village_code: get_heapless_string(row, "kd_desa")?,
            flag_type_code: row.try_get("jns_atensi")?,
            evidence_number: get_heapless_string(row, "no_bukti")?,
            evidence_date: row.try_get("tgl_bukti")?,
            evidence_description: row.try_get("ket_bukti")?,
            standard_date: row.try_get("tgl_std")?,
            actual_date: row.try_get("tgl_real")?,
            date_difference: row.try_get("tgl_dif")?,
            standard_value: row.try_get("nilai_std")?,
            actual_value: row.try_get("nilai_real")?,
            percentage: row.try_get("nilai_prc")?,
            difference: row.try_get("nilai_dif")?,
            is_red_flag: row.try_get("is_redflag")?,
            follow_up_status: get_follow_up_status(row, "status_tl")?,
            verification_status: get_verification_status(row, "status_ver")?,
            responder_name: row.try_get("nama_tl")?,
            responder_comment: row.try_get("komen_tl")?,
            attached_file_name: row.try_get("nama_file")?,
            updated_by: row.try_get("update_by")?,
            updated_at: row.try_get("update_at")?,
        })
    }
}
