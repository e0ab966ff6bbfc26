//! Manual documentation of flag details and admin-side status changes.

use cacm_desa_api::domain::{parse_code, EvidenceNumber, TenantScope, VillageCode};
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_api::requests::{CreateFlagDetailRequest, UpdateDetailStatusRequest};
use cacm_desa_db::models::{FlagDetailModel, FollowUpStatus, VerificationStatus};
use cacm_desa_db::repository::{CreateBatch, UpdateBatch};
use cacm_desa_db::unit_of_work::UnitOfWork;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::aggregator::{record_details_created, record_status_change};
use crate::history::{append_transitions, transition};
use crate::scope::scoped_period;

#[derive(Clone)]
pub struct DocumentationService {
    uow: Arc<dyn UnitOfWork>,
}

impl DocumentationService {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Add one flag detail to the finding of `village_code` in the period.
    ///
    /// The detail starts as new/pending and counts towards the finding's
    /// `flag_count` at once.
    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code, %period_id))]
    pub async fn create_detail(
        &self,
        scope: &TenantScope,
        actor: &str,
        period_id: Uuid,
        village_code: &str,
        request: CreateFlagDetailRequest,
    ) -> ApiResult<FlagDetailModel> {
        request.validate()?;
        let village_code: VillageCode = parse_code("village_code", village_code)?;
        let evidence_number: EvidenceNumber = parse_code("evidence_number", &request.evidence_number)?;

        let session = self.uow.begin().await?;
        let period = scoped_period(session.as_ref(), scope, period_id, false).await?;
        let finding = session
            .findings()
            .find_by_village(period_id, &village_code)
            .await?
            .ok_or_else(|| ApiError::not_found("village finding"))?;

        if session
            .details()
            .find_by_natural_key(finding.id, request.flag_type_code, &evidence_number)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict(format!(
                "evidence {evidence_number} is already documented for flag type {}",
                request.flag_type_code
            )));
        }

        let detail = FlagDetailModel {
            id: Uuid::new_v4(),
            finding_id: finding.id,
            period_id,
            fiscal_year: period.fiscal_year,
            region_code: period.region_code.clone(),
            period_number: period.period_number.clone(),
            village_code,
            flag_type_code: request.flag_type_code,
            evidence_number,
            evidence_date: request.evidence_date,
            evidence_description: request.evidence_description,
            standard_date: request.standard_date,
            actual_date: request.actual_date,
            date_difference: request.date_difference,
            standard_value: request.standard_value,
            actual_value: request.actual_value,
            percentage: request.percentage,
            difference: request.difference,
            is_red_flag: request.is_red_flag,
            follow_up_status: FollowUpStatus::New,
            verification_status: VerificationStatus::Pending,
            responder_name: None,
            responder_comment: None,
            attached_file_name: None,
            updated_by: Some(actor.to_string()),
            updated_at: Some(Utc::now()),
        };
        session.details().create_batch(vec![detail.clone()]).await?;
        record_details_created(session.as_ref(), finding.id, 1).await?;
        session.commit().await?;

        tracing::info!(detail_id = %detail.id, finding_id = %finding.id, "flag detail documented");
        Ok(detail)
    }

    /// Change the status codes of one detail and record the transition.
    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code, %detail_id))]
    pub async fn update_detail_status(
        &self,
        scope: &TenantScope,
        actor: &str,
        detail_id: Uuid,
        request: UpdateDetailStatusRequest,
    ) -> ApiResult<FlagDetailModel> {
        let follow_up = request
            .follow_up_status
            .map(FollowUpStatus::try_from)
            .transpose()
            .map_err(|e| ApiError::validation("follow_up_status", e.to_string()))?;
        let verification = request
            .verification_status
            .map(VerificationStatus::try_from)
            .transpose()
            .map_err(|e| ApiError::validation("verification_status", e.to_string()))?;
        if follow_up.is_none() && verification.is_none() {
            return Err(ApiError::validation("follow_up_status", "no status given"));
        }

        let session = self.uow.begin().await?;
        let mut detail = session
            .details()
            .find_for_update(detail_id)
            .await?
            .ok_or_else(|| ApiError::not_found("flag detail"))?;
        if !scope.owns(detail.fiscal_year, &detail.region_code) {
            tracing::warn!("flag detail outside the caller's scope");
            return Err(ApiError::Forbidden);
        }

        let now = Utc::now();
        let from = detail.follow_up_status;
        let to = follow_up.unwrap_or(from);
        let verification = verification.unwrap_or(detail.verification_status);

        append_transitions(
            session.as_ref(),
            vec![transition(&detail, actor, to, verification, now)],
        )
        .await?;
        detail.follow_up_status = to;
        detail.verification_status = verification;
        detail.updated_by = Some(actor.to_string());
        detail.updated_at = Some(now);
        session.details().update_batch(vec![detail.clone()]).await?;
        record_status_change(session.as_ref(), detail.finding_id, from, to).await?;
        session.commit().await?;

        tracing::info!(from = %from, to = %to, "flag detail status changed");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{sample_period, InMemoryUnitOfWork};
    use rust_decimal::Decimal;

    const VILLAGE: &str = "320101200100";

    fn scope() -> TenantScope {
        TenantScope::from_tenant_code(Some(2025), "1234").unwrap()
    }

    fn detail_request(flag_type_code: i32, evidence: &str) -> CreateFlagDetailRequest {
        CreateFlagDetailRequest {
            flag_type_code,
            evidence_number: evidence.to_string(),
            evidence_date: None,
            evidence_description: Some("Belanja ATK".to_string()),
            standard_date: None,
            actual_date: None,
            date_difference: None,
            standard_value: Some(Decimal::new(1_500_000, 0)),
            actual_value: Some(Decimal::new(2_250_000, 0)),
            percentage: Some(Decimal::new(15000, 2)),
            difference: Some(Decimal::new(750_000, 0)),
            is_red_flag: true,
        }
    }

    fn seeded() -> (InMemoryUnitOfWork, Uuid, Uuid) {
        let uow = InMemoryUnitOfWork::new();
        let period = sample_period(2025, "1234", "001");
        uow.seed(|s| {
            s.periods.insert(period.id, period.clone());
        });
        let (finding, _) = uow.archive_snapshot(period.id, VILLAGE, &[(10, "B-1")]).unwrap();
        (uow, period.id, finding.id)
    }

    #[tokio::test]
    async fn created_detail_counts_towards_its_finding() {
        let (uow, period_id, finding_id) = seeded();
        let service = DocumentationService::new(Arc::new(uow.clone()));

        let detail = service
            .create_detail(&scope(), "admin", period_id, VILLAGE, detail_request(20, "B-7"))
            .await
            .unwrap();
        assert_eq!(detail.follow_up_status, FollowUpStatus::New);
        assert_eq!(detail.verification_status, VerificationStatus::Pending);
        assert_eq!(detail.period_number.as_str(), "001");

        let state = uow.snapshot();
        assert_eq!(state.findings[&finding_id].flag_count, 2);
        assert_eq!(state.details[&detail.id].actual_value, Some(Decimal::new(2_250_000, 0)));

        let err = service
            .create_detail(&scope(), "admin", period_id, VILLAGE, detail_request(20, "B-7"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(uow.snapshot().findings[&finding_id].flag_count, 2);
    }

    #[tokio::test]
    async fn detail_needs_an_existing_finding() {
        let (uow, period_id, _) = seeded();
        let service = DocumentationService::new(Arc::new(uow.clone()));

        let err = service
            .create_detail(&scope(), "admin", period_id, "320101200999", detail_request(10, "B-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let other = TenantScope::from_tenant_code(Some(2025), "5678").unwrap();
        let err = service
            .create_detail(&other, "admin", period_id, VILLAGE, detail_request(10, "B-2"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden);
    }

    #[tokio::test]
    async fn entering_the_terminal_code_bumps_resolved_once() {
        let (uow, _, finding_id) = seeded();
        let detail_id = *uow.snapshot().details.keys().next().unwrap();
        let service = DocumentationService::new(Arc::new(uow.clone()));
        let submitted = UpdateDetailStatusRequest {
            follow_up_status: Some(7),
            verification_status: Some(2),
        };

        service
            .update_detail_status(&scope(), "admin", detail_id, submitted.clone())
            .await
            .unwrap();
        service
            .update_detail_status(&scope(), "admin", detail_id, submitted)
            .await
            .unwrap();

        let state = uow.snapshot();
        assert_eq!(state.findings[&finding_id].resolved_count, 1);
        assert_eq!(state.details[&detail_id].follow_up_status, FollowUpStatus::Submitted);
        let chain = state.history_of(detail_id);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].from_status, FollowUpStatus::New);
        assert_eq!(chain[1].from_status, FollowUpStatus::Submitted);
    }

    #[tokio::test]
    async fn unknown_codes_are_rejected() {
        let (uow, _, _) = seeded();
        let detail_id = *uow.snapshot().details.keys().next().unwrap();
        let service = DocumentationService::new(Arc::new(uow.clone()));

        let err = service
            .update_detail_status(
                &scope(),
                "admin",
                detail_id,
                UpdateDetailStatusRequest {
                    follow_up_status: Some(2),
                    verification_status: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "follow_up_status"));

        let err = service
            .update_detail_status(&scope(), "admin", detail_id, UpdateDetailStatusRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
        assert!(uow.snapshot().history.is_empty());
    }
}
