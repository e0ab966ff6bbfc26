//! Triggers for the legacy detection and archive procedures.
//!
//! The procedures resolve their own scope and return nothing structured;
//! each call is one-shot under the configured timeout, with no retry.

use cacm_desa_api::domain::{parse_code, PeriodNumber, TenantScope};
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_api::requests::{DocumentRequest, IdentifyRequest};
use cacm_desa_db::models::{AtensiPeriodModel, IdentificationLogModel};
use cacm_desa_db::repository::{DocumentationCall, RedFlagProcedures};
use cacm_desa_db::unit_of_work::UnitOfWork;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::procedure::call_with_timeout;

#[derive(Clone)]
pub struct IdentificationTrigger {
    uow: Arc<dyn UnitOfWork>,
    procedures: Arc<dyn RedFlagProcedures>,
    timeout: Duration,
}

impl IdentificationTrigger {
    pub fn new(uow: Arc<dyn UnitOfWork>, procedures: Arc<dyn RedFlagProcedures>, timeout: Duration) -> Self {
        Self {
            uow,
            procedures,
            timeout,
        }
    }

    #[tracing::instrument(skip(self, request), fields(as_of = %request.as_of_date))]
    pub async fn identify(&self, request: IdentifyRequest) -> ApiResult<()> {
        request.validate()?;
        call_with_timeout(
            "sp_cek_redflags",
            self.timeout,
            self.procedures.check_red_flags(request.as_of_date),
        )
        .await?;
        tracing::info!("red flag identification finished");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn archive(&self) -> ApiResult<()> {
        call_with_timeout("sp_arsipkan_redflags", self.timeout, self.procedures.archive_red_flags()).await?;
        tracing::info!("red flags archived");
        Ok(())
    }

    /// Create a period through the parameterised archive procedure and
    /// return the row it wrote.
    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code))]
    pub async fn document(
        &self,
        scope: &TenantScope,
        actor: &str,
        request: DocumentRequest,
    ) -> ApiResult<AtensiPeriodModel> {
        request.validate()?;
        let period_number: PeriodNumber = parse_code("period_number", &request.period_number)?;
        let raised_date = request
            .raised_date
            .ok_or_else(|| ApiError::validation("raised_date", "is required"))?;
        let cutoff_date = request
            .cutoff_date
            .ok_or_else(|| ApiError::validation("cutoff_date", "is required"))?;

        // the procedure does not check for an existing period
        let session = self.uow.begin().await?;
        let existing = session
            .periods()
            .find_by_natural_key(scope.fiscal_year, &scope.region_code, &period_number)
            .await?;
        session.rollback().await?;
        if existing.is_some() {
            return Err(ApiError::conflict(format!("atensi {period_number} already exists")));
        }

        let call = DocumentationCall {
            fiscal_year: scope.fiscal_year,
            region_code: scope.region_code.to_string(),
            cutoff_date,
            period_number: period_number.to_string(),
            raised_date,
            note: request.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            actor: actor.to_string(),
        };
        call_with_timeout(
            "sp_cacm_redflag_dokumentasi",
            self.timeout,
            self.procedures.document_red_flags(&call),
        )
        .await?;

        let session = self.uow.begin().await?;
        let created = session
            .periods()
            .find_by_natural_key(scope.fiscal_year, &scope.region_code, &period_number)
            .await?;
        session.rollback().await?;

        let period = created.ok_or_else(|| {
            ApiError::UpstreamFailure(format!(
                "sp_cacm_redflag_dokumentasi did not create atensi {period_number}"
            ))
        })?;
        tracing::info!(
            period_id = %period.id,
            villages = period.village_count,
            flags = period.flag_count,
            "atensi documented"
        );
        Ok(period)
    }

    pub async fn latest_identification(&self, scope: &TenantScope) -> ApiResult<Option<IdentificationLogModel>> {
        let session = self.uow.begin().await?;
        let latest = session
            .identification_logs()
            .latest(scope.fiscal_year, &scope.region_code)
            .await?;
        session.rollback().await?;
        Ok(latest)
    }
}
