//! Counters of a village finding.
//!
//! `flag_count` and `resolved_count` are bumped as details are created and
//! resolved. They are never recomputed; [`FindingAggregator::counter_drift`]
//! reports where they disagree with the child rows and leaves them as is.

use cacm_desa_api::domain::TenantScope;
use cacm_desa_api::error::ApiResult;
use cacm_desa_db::models::FollowUpStatus;
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::scope::scoped_period;

pub(crate) async fn record_details_created(
    session: &dyn UnitOfWorkSession,
    finding_id: Uuid,
    created: i32,
) -> ApiResult<()> {
    session.findings().increment_counters(finding_id, created, 0).await?;
    Ok(())
}

/// Bump `resolved_count` when a detail enters the terminal code.
///
/// Returns whether the counter moved.
pub(crate) async fn record_status_change(
    session: &dyn UnitOfWorkSession,
    finding_id: Uuid,
    from: FollowUpStatus,
    to: FollowUpStatus,
) -> ApiResult<bool> {
    if to.is_terminal() && !from.is_terminal() {
        session.findings().increment_counters(finding_id, 0, 1).await?;
        return Ok(true);
    }
    Ok(false)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDrift {
    pub finding_id: Uuid,
    pub village_code: String,
    pub flag_count: i32,
    pub live_flag_count: i32,
    pub resolved_count: i32,
    pub live_resolved_count: i32,
}

impl CounterDrift {
    pub fn drifted(&self) -> bool {
        self.flag_count != self.live_flag_count || self.resolved_count != self.live_resolved_count
    }
}

#[derive(Clone)]
pub struct FindingAggregator {
    uow: Arc<dyn UnitOfWork>,
}

impl FindingAggregator {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Counters of every finding of a period next to the live child counts.
    #[tracing::instrument(skip(self, scope), fields(fiscal_year = scope.fiscal_year, region_code = %scope.region_code))]
    pub async fn counter_drift(&self, scope: &TenantScope, period_id: Uuid) -> ApiResult<Vec<CounterDrift>> {
        let session = self.uow.begin().await?;
        scoped_period(session.as_ref(), scope, period_id, false).await?;
        let findings = session.findings().list_by_period(period_id).await?;
        let details = session.details().list_by_period(period_id).await?;
        session.rollback().await?;

        let mut live: HashMap<Uuid, (i32, i32)> = HashMap::new();
        for detail in &details {
            let counts = live.entry(detail.finding_id).or_default();
            counts.0 += 1;
            if detail.follow_up_status.is_terminal() {
                counts.1 += 1;
            }
        }

        let report: Vec<CounterDrift> = findings
            .into_iter()
            .map(|finding| {
                let (rows, resolved) = live.get(&finding.id).copied().unwrap_or_default();
                CounterDrift {
                    finding_id: finding.id,
                    village_code: finding.village_code.to_string(),
                    flag_count: finding.flag_count,
                    live_flag_count: rows,
                    resolved_count: finding.resolved_count,
                    live_resolved_count: resolved,
                }
            })
            .collect();

        let drifted = report.iter().filter(|r| r.drifted()).count();
        if drifted > 0 {
            tracing::warn!(%period_id, drifted, "finding counters disagree with child rows");
        }
        Ok(report)
    }
}
