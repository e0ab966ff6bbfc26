use async_trait::async_trait;
use cacm_desa_db::models::{AtensiPeriodModel, PeriodFilter};
use cacm_desa_db::repository::{AtensiPeriodRepository, Page, PageRequest, RepositoryResult};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct AtensiPeriodRepositoryImpl {
    pub executor: Executor,
}

impl AtensiPeriodRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AtensiPeriodRepository for AtensiPeriodRepositoryImpl {
    async fn find_by_natural_key(
        &self,
        fiscal_year: i32,
        region_code: &str,
        period_number: &str,
    ) -> RepositoryResult<Option<AtensiPeriodModel>> {
        self.find_by_natural_key_impl(fiscal_year, region_code, period_number)
            .await
    }

    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        self.find_for_update_impl(id).await
    }

    async fn mark_sent(&self, id: Uuid, actor: &str, at: DateTime<Utc>) -> RepositoryResult<bool> {
        self.mark_sent_impl(id, actor, at).await
    }

    async fn list(
        &self,
        fiscal_year: i32,
        region_code: &str,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<AtensiPeriodModel>> {
        self.list_impl(fiscal_year, region_code, filter, page).await
    }
}

impl TryFromRow<PgRow> for AtensiPeriodModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(AtensiPeriodModel {
            id: row.try_get("id")?,
            fiscal_year: row.try_get("tahun")?,
            region_code: get_heapless_string(row, "kd_pemda")?,
            period_number: get_heapless_string(row, "no_atensi")?,
            raised_date: row.try_get("tgl_atensi")?,
            cutoff_date: row.try_get("tgl_cutoff")?,
            note: row.try_get("keterangan")?,
            village_count: row.try_get("jlh_desa")?,
            flag_count: row.try_get("jlh_rf")?,
            resolved_count: row.try_get("jlh_tl")?,
            is_sent: row.try_get("is_sent")?,
            created_by: row.try_get("create_by")?,
            created_at: row.try_get("create_at")?,
            updated_by: row.try_get("update_by")?,
            updated_at: row.try_get("update_at")?,
        })
    }
}
