//! Atensi period management.
//!
//! All operations work inside the caller's [`TenantScope`]. A period of
//! another tenant is reported as `Forbidden`, an absent one as `NotFound`.

use cacm_desa_api::domain::{parse_code, PeriodNumber, TenantScope};
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_api::requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest};
use cacm_desa_db::models::{
    follow_up_catalog, verification_catalog, AtensiPeriodModel, FlagDetailModel, FlagTypeModel,
    PeriodFilter, PeriodFlagType, StatusCodeEntry, VillageFindingModel,
};
use cacm_desa_db::repository::{
    CreateBatch, DeleteBatch, FindById, Page, PageRequest, UpdateBatch,
};
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::FlagTypeCatalog;
use crate::scope::scoped_period;

const DEFAULT_PAGE_SIZE: usize = 20;

/// A finding together with the village's reference name, when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingView {
    #[serde(flatten)]
    pub finding: VillageFindingModel,
    pub village_name: Option<String>,
}

/// Everything the documentation screen shows for one village of a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingDetailView {
    #[serde(flatten)]
    pub finding: FindingView,
    pub items: Vec<FlagDetailModel>,
    pub flag_types: Vec<FlagTypeModel>,
    pub follow_up_statuses: Vec<StatusCodeEntry>,
    pub verification_statuses: Vec<StatusCodeEntry>,
}

fn required_date(field: &str, value: Option<NaiveDate>) -> ApiResult<NaiveDate> {
    value.ok_or_else(|| ApiError::validation(field, "is required"))
}

/// An empty or blank note is stored as no note.
fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[derive(Clone)]
pub struct PeriodManager {
    uow: Arc<dyn UnitOfWork>,
    catalog: FlagTypeCatalog,
}

impl PeriodManager {
    pub fn new(uow: Arc<dyn UnitOfWork>, catalog: FlagTypeCatalog) -> Self {
        Self { uow, catalog }
    }

    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code))]
    pub async fn create(
        &self,
        scope: &TenantScope,
        actor: &str,
        request: CreatePeriodRequest,
    ) -> ApiResult<AtensiPeriodModel> {
        request.validate()?;
        let period_number: PeriodNumber = parse_code("period_number", &request.period_number)?;
        let raised_date = required_date("raised_date", request.raised_date)?;
        let cutoff_date = required_date("cutoff_date", request.cutoff_date)?;

        let session = self.uow.begin().await?;
        if session
            .periods()
            .find_by_natural_key(scope.fiscal_year, &scope.region_code, &period_number)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(format!("atensi {period_number} already exists")));
        }

        let period = AtensiPeriodModel {
            id: Uuid::new_v4(),
            fiscal_year: scope.fiscal_year,
            region_code: scope.region_code.clone(),
            period_number,
            raised_date,
            cutoff_date,
            note: normalize_note(request.note),
            village_count: 0,
            flag_count: 0,
            resolved_count: 0,
            is_sent: false,
            created_by: Some(actor.to_string()),
            created_at: Some(Utc::now()),
            updated_by: None,
            updated_at: None,
        };
        session.periods().create_batch(vec![period.clone()]).await?;
        session.commit().await?;

        tracing::info!(period_id = %period.id, period_number = %period.period_number, "atensi created");
        Ok(period)
    }

    pub async fn get(&self, scope: &TenantScope, id: Uuid) -> ApiResult<AtensiPeriodModel> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, id, false).await
    }

    /// Partial update. A new period number must stay unique within the scope.
    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code))]
    pub async fn update(
        &self,
        scope: &TenantScope,
        actor: &str,
        id: Uuid,
        request: UpdatePeriodRequest,
    ) -> ApiResult<AtensiPeriodModel> {
        request.validate()?;
        let session = self.uow.begin().await?;
        let mut period = scoped_period(session.as_ref(), scope, id, true).await?;

        if let Some(raw) = request.period_number.as_deref() {
            let renamed: PeriodNumber = parse_code("period_number", raw)?;
            if renamed != period.period_number {
                let taken = session
                    .periods()
                    .find_by_natural_key(scope.fiscal_year, &scope.region_code, &renamed)
                    .await?;
                if taken.is_some_and(|other| other.id != id) {
                    return Err(ApiError::conflict(format!("atensi {renamed} already exists")));
                }
                if period.is_sent {
                    tracing::warn!(period_id = %id, "renaming a period that was already sent");
                }
                period.period_number = renamed;
            }
        }
        if let Some(raised_date) = request.raised_date {
            period.raised_date = raised_date;
        }
        if let Some(cutoff_date) = request.cutoff_date {
            period.cutoff_date = cutoff_date;
        }
        if request.note.is_some() {
            period.note = normalize_note(request.note);
        }
        period.updated_by = Some(actor.to_string());
        period.updated_at = Some(Utc::now());

        session.periods().update_batch(vec![period.clone()]).await?;
        session.commit().await?;
        Ok(period)
    }

    /// Remove a period with its findings and flag details.
    #[tracing::instrument(skip(self, scope), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code))]
    pub async fn delete(&self, scope: &TenantScope, id: Uuid) -> ApiResult<()> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, id, true).await?;
        let deleted = session.periods().delete_batch(&[id]).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("atensi"));
        }
        session.commit().await?;
        tracing::info!(period_id = %id, "atensi deleted");
        Ok(())
    }

    pub async fn list(&self, scope: &TenantScope, query: PeriodListQuery) -> ApiResult<Page<AtensiPeriodModel>> {
        query.validate()?;
        let page = PageRequest::for_page(
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            query.page.unwrap_or(1),
        );
        let filter = PeriodFilter {
            q: query.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            is_sent: query.is_sent,
        };

        let session = self.uow.begin().await?;
        let result = session
            .periods()
            .list(scope.fiscal_year, &scope.region_code, &filter, page)
            .await?;
        Ok(result)
    }

    /// Flag types present in the period, ascending by code.
    pub async fn flag_types(&self, scope: &TenantScope, id: Uuid) -> ApiResult<Vec<PeriodFlagType>> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, id, false).await?;
        let codes = session.details().distinct_flag_types(id).await?;
        let catalog = self.catalog.resolve(session.as_ref(), &codes).await?;

        Ok(codes
            .into_iter()
            .map(|code| {
                let entry = catalog.get(&code);
                PeriodFlagType {
                    code,
                    name: entry.map(|t| t.name.clone()),
                    abbreviation: entry.and_then(|t| t.abbreviation.clone()),
                }
            })
            .collect())
    }

    pub async fn findings(&self, scope: &TenantScope, id: Uuid) -> ApiResult<Vec<FindingView>> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, id, false).await?;
        let findings = session.findings().list_by_period(id).await?;
        with_village_names(session.as_ref(), findings).await
    }

    /// One finding of the period with its items and the catalogs needed to
    /// render them. A finding of another period is `NotFound`.
    pub async fn finding_detail(
        &self,
        scope: &TenantScope,
        period_id: Uuid,
        finding_id: Uuid,
    ) -> ApiResult<FindingDetailView> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, period_id, false).await?;
        let finding = session
            .findings()
            .find_by_id(finding_id)
            .await?
            .filter(|f| f.period_id == period_id)
            .ok_or_else(|| ApiError::not_found("village finding"))?;

        let items = session.details().list_by_finding(finding_id).await?;
        let mut codes: Vec<i32> = items.iter().map(|d| d.flag_type_code).collect();
        codes.dedup();
        let flag_types = self
            .catalog
            .resolve(session.as_ref(), &codes)
            .await?
            .into_values()
            .collect();

        let finding = with_village_names(session.as_ref(), vec![finding])
            .await?
            .pop()
            .ok_or_else(|| ApiError::InternalError("finding lost while naming villages".to_string()))?;

        Ok(FindingDetailView {
            finding,
            items,
            flag_types,
            follow_up_statuses: follow_up_catalog(),
            verification_statuses: verification_catalog(),
        })
    }
}

async fn with_village_names(
    session: &dyn UnitOfWorkSession,
    findings: Vec<VillageFindingModel>,
) -> ApiResult<Vec<FindingView>> {
    let codes: Vec<String> = findings.iter().map(|f| f.village_code.to_string()).collect();
    let mut names = session.villages().load_names(&codes).await?;
    Ok(findings
        .into_iter()
        .map(|finding| {
            let village_name = names.remove(finding.village_code.as_str());
            FindingView {
                finding,
                village_name,
            }
        })
        .collect())
}
