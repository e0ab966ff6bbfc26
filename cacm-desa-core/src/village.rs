//! Village (mobile) side of the workflow.
//!
//! A village session sees only rows of its own village code and fiscal
//! year. Rows of another village are `Forbidden`.

use cacm_desa_api::domain::MobileIdentity;
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_api::requests::RespondRequest;
use cacm_desa_db::models::{
    FlagDetailModel, FollowUpStatus, RemediationView, VerificationStatus, VillageFindingModel,
};
use cacm_desa_db::repository::{FindById, RedFlagProcedures, UpdateBatch};
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

use crate::aggregator::record_status_change;
use crate::history::{append_transitions, transition};
use crate::procedure::call_with_timeout;

const COMPLETED: [FollowUpStatus; 2] = [FollowUpStatus::Resolved, FollowUpStatus::Submitted];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingItems {
    #[serde(flatten)]
    pub finding: VillageFindingModel,
    pub items: Vec<FlagDetailModel>,
}

fn owns(identity: &MobileIdentity, fiscal_year: i32, village_code: &str) -> bool {
    identity.fiscal_year == fiscal_year && identity.village_code.as_str() == village_code
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// With `for_update` the row stays locked until the session ends, so two
/// responses to one row apply one after the other.
async fn owned_detail(
    session: &dyn UnitOfWorkSession,
    identity: &MobileIdentity,
    detail_id: Uuid,
    for_update: bool,
) -> ApiResult<FlagDetailModel> {
    let detail = if for_update {
        session.details().find_for_update(detail_id).await?
    } else {
        session.details().find_by_id(detail_id).await?
    };
    let detail = detail.ok_or_else(|| ApiError::not_found("flag detail"))?;
    if !owns(identity, detail.fiscal_year, &detail.village_code) {
        tracing::warn!(
            %detail_id,
            village_code = %identity.village_code,
            "flag detail of another village"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(detail)
}

#[derive(Clone)]
pub struct VillagePortal {
    uow: Arc<dyn UnitOfWork>,
    procedures: Arc<dyn RedFlagProcedures>,
    timeout: Duration,
}

impl VillagePortal {
    pub fn new(uow: Arc<dyn UnitOfWork>, procedures: Arc<dyn RedFlagProcedures>, timeout: Duration) -> Self {
        Self {
            uow,
            procedures,
            timeout,
        }
    }

    /// Findings sent to the village, newest period first.
    pub async fn dispatched_findings(&self, identity: &MobileIdentity) -> ApiResult<Vec<VillageFindingModel>> {
        let session = self.uow.begin().await?;
        let findings = session
            .findings()
            .list_by_village(identity.fiscal_year, &identity.village_code, FollowUpStatus::SentToVillage)
            .await?;
        session.rollback().await?;
        Ok(findings)
    }

    pub async fn finding_items(&self, identity: &MobileIdentity, finding_id: Uuid) -> ApiResult<FindingItems> {
        let session = self.uow.begin().await?;
        let finding = session
            .findings()
            .find_by_id(finding_id)
            .await?
            .ok_or_else(|| ApiError::not_found("village finding"))?;
        if !owns(identity, finding.fiscal_year, &finding.village_code) {
            tracing::warn!(%finding_id, village_code = %identity.village_code, "finding of another village");
            return Err(ApiError::Forbidden);
        }
        // only findings that were sent are visible to the village
        if finding.follow_up_status != FollowUpStatus::SentToVillage {
            return Err(ApiError::not_found("village finding"));
        }
        let items = session.details().list_by_finding(finding_id).await?;
        session.rollback().await?;
        Ok(FindingItems { finding, items })
    }

    pub async fn completed_items(&self, identity: &MobileIdentity) -> ApiResult<Vec<FlagDetailModel>> {
        let session = self.uow.begin().await?;
        let items = session
            .details()
            .list_by_village_statuses(identity.fiscal_year, &identity.village_code, &COMPLETED)
            .await?;
        session.rollback().await?;
        Ok(items)
    }

    pub async fn response(&self, identity: &MobileIdentity, detail_id: Uuid) -> ApiResult<RemediationView> {
        let session = self.uow.begin().await?;
        let detail = owned_detail(session.as_ref(), identity, detail_id, false).await?;
        session.rollback().await?;
        Ok(RemediationView::from(&detail))
    }

    /// Record the village's remediation of one flagged item.
    ///
    /// Any prior status is overwritten; the row ends resolved and submitted.
    #[tracing::instrument(skip(self, identity, request), fields(user = %identity.username, village_code = %identity.village_code, %detail_id))]
    pub async fn respond(
        &self,
        identity: &MobileIdentity,
        detail_id: Uuid,
        request: RespondRequest,
    ) -> ApiResult<RemediationView> {
        request.validate()?;
        let session = self.uow.begin().await?;
        let mut detail = owned_detail(session.as_ref(), identity, detail_id, true).await?;

        let now = Utc::now();
        let from = detail.follow_up_status;
        let to = FollowUpStatus::Submitted;
        let verification = VerificationStatus::Submitted;
        if from != FollowUpStatus::Dispatched {
            tracing::debug!(from = %from, "response to a row that was not dispatched");
        }

        append_transitions(
            session.as_ref(),
            vec![transition(&detail, &identity.username, to, verification, now)],
        )
        .await?;
        detail.follow_up_status = to;
        detail.verification_status = verification;
        detail.responder_name = blank_to_none(request.responder_name);
        detail.responder_comment = blank_to_none(request.responder_comment);
        detail.attached_file_name = blank_to_none(request.attached_file_name);
        detail.updated_by = Some(identity.username.clone());
        detail.updated_at = Some(now);
        session.details().update_batch(vec![detail.clone()]).await?;
        record_status_change(session.as_ref(), detail.finding_id, from, to).await?;
        session.commit().await?;

        tracing::info!("village response recorded");
        Ok(RemediationView::from(&detail))
    }

    pub async fn refresh_follow_up(&self, identity: &MobileIdentity) -> ApiResult<()> {
        call_with_timeout(
            "sp_refresh_tl",
            self.timeout,
            self.procedures
                .refresh_follow_up(&identity.village_code, identity.fiscal_year),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{code, sample_period, InMemoryUnitOfWork, StubProcedures};

    const VILLAGE_A: &str = "320101200100";
    const VILLAGE_B: &str = "320101200200";

    fn identity(village: &str, fiscal_year: i32) -> MobileIdentity {
        MobileIdentity {
            username: format!("op{village}"),
            village_code: code(village),
            village_name: String::new(),
            fiscal_year,
            region_code: code("3201"),
        }
    }

    fn portal(uow: &InMemoryUnitOfWork, stub: &StubProcedures) -> VillagePortal {
        VillagePortal::new(Arc::new(uow.clone()), Arc::new(stub.clone()), Duration::from_secs(5))
    }

    fn respond_request() -> RespondRequest {
        RespondRequest {
            responder_name: Some("Kaur Keuangan".into()),
            responder_comment: Some("Bukti setor sudah dilengkapi".into()),
            attached_file_name: Some("bukti-setor.pdf".into()),
        }
    }

    /// Village A and B each have one finding; A's was sent.
    fn seeded() -> (InMemoryUnitOfWork, VillageFindingModel, VillageFindingModel) {
        let uow = InMemoryUnitOfWork::new();
        let period = sample_period(2025, "3201", "001");
        uow.seed(|s| {
            s.periods.insert(period.id, period.clone());
        });
        let (a, _) = uow.archive_snapshot(period.id, VILLAGE_A, &[(10, "B-1"), (20, "B-2")]).unwrap();
        let (b, _) = uow.archive_snapshot(period.id, VILLAGE_B, &[(10, "B-3")]).unwrap();
        uow.seed(|s| {
            for f in s.findings.values_mut() {
                f.follow_up_status = FollowUpStatus::SentToVillage;
            }
            for d in s.details.values_mut() {
                d.follow_up_status = FollowUpStatus::Dispatched;
            }
        });
        (uow, a, b)
    }

    fn detail_of(uow: &InMemoryUnitOfWork, village: &str, flag_type_code: i32) -> Uuid {
        uow.snapshot()
            .details
            .values()
            .find(|d| d.village_code.as_str() == village && d.flag_type_code == flag_type_code)
            .map(|d| d.id)
            .unwrap()
    }

    #[tokio::test]
    async fn response_to_another_village_is_forbidden() {
        let (uow, _, _) = seeded();
        let stub = StubProcedures::new();
        let target = detail_of(&uow, VILLAGE_B, 10);
        let before = uow.snapshot();

        let err = portal(&uow, &stub)
            .respond(&identity(VILLAGE_A, 2025), target, respond_request())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden);
        assert_eq!(uow.snapshot().details, before.details);

        // same village, other fiscal year
        let err = portal(&uow, &stub)
            .respond(&identity(VILLAGE_B, 2024), target, respond_request())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden);

        let err = portal(&uow, &stub)
            .response(&identity(VILLAGE_A, 2025), target)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden);
    }

    #[tokio::test]
    async fn respond_submits_and_counts_once() {
        let (uow, a, _) = seeded();
        let stub = StubProcedures::new();
        let target = detail_of(&uow, VILLAGE_A, 10);
        let portal = portal(&uow, &stub);
        let me = identity(VILLAGE_A, 2025);

        let view = portal.respond(&me, target, respond_request()).await.unwrap();
        assert_eq!(view.follow_up_status, FollowUpStatus::Submitted);
        assert_eq!(view.verification_status, VerificationStatus::Submitted);
        assert_eq!(view.attached_file_name.as_deref(), Some("bukti-setor.pdf"));

        // a second response overwrites the fields but does not count again
        let amended = RespondRequest {
            attached_file_name: Some("  ".into()),
            ..respond_request()
        };
        portal.respond(&me, target, amended).await.unwrap();

        let state = uow.snapshot();
        assert_eq!(state.findings[&a.id].resolved_count, 1);
        assert_eq!(state.details[&target].attached_file_name, None);
        assert_eq!(state.details[&target].updated_by.as_deref(), Some("op320101200100"));
        assert_eq!(state.history_of(target).len(), 2);

        let stored = portal.response(&me, target).await.unwrap();
        assert_eq!(stored.responder_name.as_deref(), Some("Kaur Keuangan"));
    }

    #[tokio::test]
    async fn portal_lists_only_the_callers_rows() {
        let (uow, a, b) = seeded();
        let stub = StubProcedures::new();
        let portal = portal(&uow, &stub);
        let me = identity(VILLAGE_A, 2025);

        let findings = portal.dispatched_findings(&me).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, a.id);

        let items = portal.finding_items(&me, a.id).await.unwrap();
        assert_eq!(items.items.len(), 2);
        assert_eq!(portal.finding_items(&me, b.id).await.unwrap_err(), ApiError::Forbidden);

        uow.seed(|s| {
            if let Some(f) = s.findings.get_mut(&a.id) {
                f.follow_up_status = FollowUpStatus::NotSelected;
            }
        });
        assert!(matches!(
            portal.finding_items(&me, a.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(portal.dispatched_findings(&me).await.unwrap().is_empty());

        assert!(portal.completed_items(&me).await.unwrap().is_empty());
        portal
            .respond(&me, detail_of(&uow, VILLAGE_A, 20), respond_request())
            .await
            .unwrap();
        let completed = portal.completed_items(&me).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].flag_type_code, 20);
    }

    #[tokio::test]
    async fn refresh_calls_the_procedure_for_the_village() {
        let (uow, _, _) = seeded();
        let stub = StubProcedures::new();
        portal(&uow, &stub)
            .refresh_follow_up(&identity(VILLAGE_A, 2025))
            .await
            .unwrap();
        assert_eq!(stub.calls(), vec!["sp_refresh_tl(320101200100, 2025)"]);

        stub.fail_with("procedure missing");
        let err = portal(&uow, &stub)
            .refresh_follow_up(&identity(VILLAGE_A, 2025))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UpstreamFailure(_)));
    }
}
