//! Dispatch (kirim) of a period to its villages.
//!
//! One transaction moves every flag detail of the period to either
//! dispatched or not selected, records the history, updates each village
//! finding and seals the period. The period row and its detail rows are
//! locked for the whole transaction and `mark_sent` only succeeds while
//! `is_sent` is still false, so at most one dispatch of a period ever commits
//! and no village response interleaves with it.

use cacm_desa_api::domain::TenantScope;
use cacm_desa_api::error::{ApiError, ApiResult};
use cacm_desa_api::requests::DispatchRequest;
use cacm_desa_db::models::{FollowUpStatus, VerificationStatus};
use cacm_desa_db::repository::UpdateBatch;
use cacm_desa_db::unit_of_work::UnitOfWork;
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::history::{append_transitions, transition};
use crate::scope::scoped_period;

const ALREADY_SENT: &str = "already sent";

/// What one dispatch changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    pub period_id: Uuid,
    pub dispatched: usize,
    pub not_selected: usize,
    pub findings_sent: usize,
    pub findings_closed: usize,
}

#[derive(Clone)]
pub struct DispatchEngine {
    uow: Arc<dyn UnitOfWork>,
}

impl DispatchEngine {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Dispatch the selected flag types of a period.
    ///
    /// A period that was already sent is a `Conflict` whatever the
    /// selection. Any failure before commit leaves the period untouched.
    #[tracing::instrument(skip(self, scope, request), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code, %period_id))]
    pub async fn dispatch(
        &self,
        scope: &TenantScope,
        actor: &str,
        period_id: Uuid,
        request: DispatchRequest,
    ) -> ApiResult<DispatchSummary> {
        let session = self.uow.begin().await?;
        let period = scoped_period(session.as_ref(), scope, period_id, true).await?;
        if period.is_sent {
            return Err(ApiError::conflict(ALREADY_SENT));
        }
        request.validate()?;
        let selected: BTreeSet<i32> = request.selected_flag_type_codes.into_iter().collect();

        let now = Utc::now();
        let mut details = session.details().list_by_period_for_update(period_id).await?;
        let mut transitions = Vec::with_capacity(details.len());
        let mut dispatched_findings: HashSet<Uuid> = HashSet::new();
        let mut dispatched = 0;

        for detail in details.iter_mut() {
            let (to, verification) = if selected.contains(&detail.flag_type_code) {
                dispatched += 1;
                dispatched_findings.insert(detail.finding_id);
                (FollowUpStatus::Dispatched, VerificationStatus::Pending)
            } else {
                (FollowUpStatus::NotSelected, VerificationStatus::NotApplicable)
            };
            transitions.push(transition(detail, actor, to, verification, now));
            detail.follow_up_status = to;
            detail.verification_status = verification;
            detail.updated_by = Some(actor.to_string());
            detail.updated_at = Some(now);
        }
        let not_selected = details.len() - dispatched;

        append_transitions(session.as_ref(), transitions).await?;
        if !details.is_empty() {
            session.details().update_batch(details).await?;
        }

        let mut findings = session.findings().list_by_period(period_id).await?;
        for finding in findings.iter_mut() {
            if dispatched_findings.contains(&finding.id) {
                finding.follow_up_status = FollowUpStatus::SentToVillage;
                finding.verification_status = VerificationStatus::Pending;
            } else {
                finding.follow_up_status = FollowUpStatus::NotSelected;
                finding.verification_status = VerificationStatus::NotApplicable;
            }
            finding.updated_by = Some(actor.to_string());
            finding.updated_at = Some(now);
        }
        let findings_sent = dispatched_findings.len();
        let findings_closed = findings.len() - findings_sent;
        if !findings.is_empty() {
            session.findings().update_batch(findings).await?;
        }

        if !session.periods().mark_sent(period_id, actor, now).await? {
            return Err(ApiError::conflict(ALREADY_SENT));
        }
        session.commit().await?;

        tracing::info!(
            dispatched,
            not_selected,
            findings_sent,
            findings_closed,
            "atensi dispatched"
        );
        Ok(DispatchSummary {
            period_id,
            dispatched,
            not_selected,
            findings_sent,
            findings_closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{sample_period, FaultPoint, InMemoryUnitOfWork};
    use cacm_desa_db::models::verify_chain;

    fn scope() -> TenantScope {
        TenantScope::from_tenant_code(Some(2025), "1234").unwrap()
    }

    fn select(codes: &[i32]) -> DispatchRequest {
        DispatchRequest {
            selected_flag_type_codes: codes.to_vec(),
        }
    }

    /// Two villages: one with a selected flag type, one with only unselected ones.
    fn seeded() -> (InMemoryUnitOfWork, Uuid) {
        let uow = InMemoryUnitOfWork::new();
        let period = sample_period(2025, "1234", "001");
        uow.seed(|s| {
            s.periods.insert(period.id, period.clone());
        });
        uow.archive_snapshot(period.id, "320101200100", &[(10, "B-1"), (20, "B-2"), (30, "B-3")])
            .unwrap();
        uow.archive_snapshot(period.id, "320101200200", &[(30, "B-4"), (40, "B-5")])
            .unwrap();
        (uow, period.id)
    }

    #[tokio::test]
    async fn every_row_gets_its_target_status() {
        let (uow, period_id) = seeded();
        let summary = DispatchEngine::new(Arc::new(uow.clone()))
            .dispatch(&scope(), "admin", period_id, select(&[10, 20]))
            .await
            .unwrap();
        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.not_selected, 3);
        assert_eq!(summary.findings_sent, 1);
        assert_eq!(summary.findings_closed, 1);

        let state = uow.snapshot();
        assert!(state.periods[&period_id].is_sent);
        for detail in state.details_of_period(period_id) {
            let expected = if [10, 20].contains(&detail.flag_type_code) {
                (FollowUpStatus::Dispatched, VerificationStatus::Pending)
            } else {
                (FollowUpStatus::NotSelected, VerificationStatus::NotApplicable)
            };
            assert_eq!((detail.follow_up_status, detail.verification_status), expected);

            let chain = state.history_of(detail.id);
            assert_eq!(chain.len(), 1);
            assert_eq!(chain[0].from_status, FollowUpStatus::New);
            assert_eq!(chain[0].to_status, expected.0);
            assert!(verify_chain(&chain));
        }

        let mut findings: Vec<_> = state.findings.values().collect();
        findings.sort_by(|a, b| a.village_code.cmp(&b.village_code));
        assert_eq!(findings[0].follow_up_status, FollowUpStatus::SentToVillage);
        assert_eq!(findings[1].follow_up_status, FollowUpStatus::NotSelected);
        assert_eq!(findings[1].verification_status, VerificationStatus::NotApplicable);
    }

    #[tokio::test]
    async fn failure_mid_transaction_changes_nothing() {
        for fault in [
            FaultPoint::HistoryAppend,
            FaultPoint::DetailUpdate,
            FaultPoint::FindingUpdate,
            FaultPoint::MarkSent,
            FaultPoint::Commit,
        ] {
            let (uow, period_id) = seeded();
            let before = uow.snapshot();
            uow.fail_on(fault);

            let result = DispatchEngine::new(Arc::new(uow.clone()))
                .dispatch(&scope(), "admin", period_id, select(&[10]))
                .await;
            assert!(matches!(result, Err(ApiError::DatabaseError(_))), "{fault:?}");

            let after = uow.snapshot();
            assert!(!after.periods[&period_id].is_sent, "{fault:?}");
            assert_eq!(after.details, before.details, "{fault:?}");
            assert_eq!(after.findings, before.findings, "{fault:?}");
            assert!(after.history.is_empty(), "{fault:?}");

            // the caller retries the whole call
            uow.clear_faults();
            DispatchEngine::new(Arc::new(uow.clone()))
                .dispatch(&scope(), "admin", period_id, select(&[10]))
                .await
                .unwrap();
            assert!(uow.snapshot().periods[&period_id].is_sent);
        }
    }

    #[tokio::test]
    async fn second_dispatch_is_a_conflict_whatever_the_selection() {
        let (uow, period_id) = seeded();
        let engine = DispatchEngine::new(Arc::new(uow.clone()));
        engine.dispatch(&scope(), "admin", period_id, select(&[10])).await.unwrap();
        let after_first = uow.snapshot();

        for selection in [vec![10], vec![20, 30], vec![]] {
            let err = engine
                .dispatch(&scope(), "admin", period_id, select(&selection))
                .await
                .unwrap_err();
            assert_eq!(err, ApiError::Conflict("already sent".into()));
        }
        assert_eq!(uow.snapshot().details, after_first.details);
        assert_eq!(uow.snapshot().history.len(), after_first.history.len());
    }

    #[tokio::test]
    async fn empty_selection_is_a_validation_error() {
        let (uow, period_id) = seeded();
        let err = DispatchEngine::new(Arc::new(uow.clone()))
            .dispatch(&scope(), "admin", period_id, select(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
        assert!(!uow.snapshot().periods[&period_id].is_sent);
    }

    #[tokio::test]
    async fn foreign_period_cannot_be_dispatched() {
        let (uow, period_id) = seeded();
        let other = TenantScope::from_tenant_code(Some(2025), "5678").unwrap();
        let err = DispatchEngine::new(Arc::new(uow.clone()))
            .dispatch(&other, "admin", period_id, select(&[10]))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden);
        assert!(!uow.snapshot().periods[&period_id].is_sent);
    }
}
