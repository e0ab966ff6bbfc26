use async_trait::async_trait;
use cacm_desa_db::models::{FollowUpStatus, VillageFindingModel};
use cacm_desa_db::repository::{RepositoryResult, VillageFindingRepository};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::{get_follow_up_status, get_heapless_string, get_verification_status, TryFromRow};

pub struct VillageFindingRepositoryImpl {
    pub executor: Executor,
}

impl VillageFindingRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl VillageFindingRepository for VillageFindingRepositoryImpl {
    async fn find_by_village(
        &self,
        period_id: Uuid,
        village_code: &str,
    ) -> RepositoryResult<Option<VillageFindingModel>> {
        self.find_by_village_impl(period_id, village_code).await
    }

    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<VillageFindingModel>> {
        self.list_by_period_impl(period_id).await
    }

    async fn list_by_village(
        &self,
        fiscal_year: i32,
        village_code: &str,
        status: FollowUpStatus,
    ) -> RepositoryResult<Vec<VillageFindingModel>> {
        self.list_by_village_impl(fiscal_year, village_code, status).await
    }

    async fn increment_counters(
        &self,
        id: Uuid,
        flag_delta: i32,
        resolved_delta: i32,
    ) -> RepositoryResult<()> {
        self.increment_counters_impl(id, flag_delta, resolved_delta).await
    }
}

impl TryFromRow<PgRow> for VillageFindingModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(VillageFindingModel {
            id: row.try_get("id")?,
            period_id: row.try_get("atensi_id")?,
            fiscal_year: row.try_get("tahun")?,
            region_code: get_heapless_string(row, "kd_pemda")?,
            period_number: get_heapless_string(row, "no_atensi")?,
            village_code: get_heapless_string(row, "kd_desa")?,
            flag_count: row.try_get("jlh_rf")?,
            resolved_count: row.try_get("jlh_tl")?,
            follow_up_status: get_follow_up_status(row, "status_tl")?,
            verification_status: get_verification_status(row, "status_ver")?,
            updated_by: row.try_get("update_by")?,
            updated_at: row.try_get("update_at")?,
        })
    }
}
