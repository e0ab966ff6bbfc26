//! In-memory unit of work and procedure stubs for workflow tests.
//!
//! A session works on a private copy of the committed state and swaps it in
//! on commit, so a dropped or failed session leaves no trace. Unique
//! constraints and cascades mirror the Postgres schema. Fault points make a
//! chosen repository call fail to exercise rollback paths.

use async_trait::async_trait;
use cacm_desa_db::models::{
    AdminSessionModel, AtensiPeriodModel, FlagDetailModel, FlagTypeModel, FollowUpStatus,
    IdentificationLogModel, LegacyUserModel, PeriodFilter, StatusTransitionModel, TenantModel,
    VerificationStatus, VillageFindingModel,
};
use cacm_desa_db::repository::{
    AdminSessionRepository, AtensiPeriodRepository, CreateBatch, DeleteBatch, DocumentationCall,
    FindById, FlagDetailRepository, FlagTypeRepository, IdentificationLogRepository, LegacyLoginCall,
    LegacyLoginProcedure, LegacyUserRepository, LoadBatch, Page, PageRequest, RedFlagProcedures,
    RepositoryError, RepositoryResult, StatusHistoryRepository, TenantRepository, UpdateBatch,
    VillageFindingRepository, VillageRepository,
};
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Everything the in-memory store holds.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub periods: BTreeMap<Uuid, AtensiPeriodModel>,
    pub findings: BTreeMap<Uuid, VillageFindingModel>,
    pub details: BTreeMap<Uuid, FlagDetailModel>,
    pub history: Vec<StatusTransitionModel>,
    pub flag_types: BTreeMap<i32, FlagTypeModel>,
    pub villages: HashMap<String, String>,
    pub identification_logs: Vec<IdentificationLogModel>,
    pub tenants: HashMap<Uuid, TenantModel>,
    pub users: HashMap<String, LegacyUserModel>,
    pub admin_sessions: HashMap<Uuid, AdminSessionModel>,
}

impl MemoryState {
    pub fn details_of_period(&self, period_id: Uuid) -> Vec<&FlagDetailModel> {
        self.details
            .values()
            .filter(|d| d.period_id == period_id)
            .collect()
    }

    pub fn history_of(&self, detail_id: Uuid) -> Vec<StatusTransitionModel> {
        self.history
            .iter()
            .filter(|h| h.detail_id == detail_id)
            .cloned()
            .collect()
    }
}

/// Repository calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    DetailUpdate,
    FindingUpdate,
    HistoryAppend,
    MarkSent,
    Commit,
}

type Shared = Arc<Mutex<MemoryState>>;
type Faults = Arc<Mutex<HashSet<FaultPoint>>>;

fn check_fault(faults: &Faults, point: FaultPoint) -> RepositoryResult<()> {
    if faults.lock().contains(&point) {
        return Err(RepositoryError::Backend(format!("injected failure at {point:?}")));
    }
    Ok(())
}

#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    committed: Shared,
    faults: Faults,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, point: FaultPoint) {
        self.faults.lock().insert(point);
    }

    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> MemoryState {
        self.committed.lock().clone()
    }

    /// Mutate the committed state directly, outside any session.
    pub fn seed<F: FnOnce(&mut MemoryState)>(&self, f: F) {
        f(&mut self.committed.lock());
    }

    pub fn create_session(&self) -> MemorySession {
        let working: Shared = Arc::new(Mutex::new(self.committed.lock().clone()));
        let store = Store {
            state: working.clone(),
            faults: self.faults.clone(),
        };
        MemorySession {
            working,
            committed: self.committed.clone(),
            faults: self.faults.clone(),
            store,
        }
    }

    /// What the archive procedure does for one village: a finding plus one
    /// detail per `(flag type, evidence)` pair, counters bumped accordingly.
    pub fn archive_snapshot(
        &self,
        period_id: Uuid,
        village_code: &str,
        items: &[(i32, &str)],
    ) -> Option<(VillageFindingModel, Vec<FlagDetailModel>)> {
        let mut state = self.committed.lock();
        let period = state.periods.get(&period_id)?.clone();
        let mut finding = sample_finding(&period, village_code);
        finding.flag_count = items.len() as i32;
        let details: Vec<FlagDetailModel> = items
            .iter()
            .map(|(code, evidence)| sample_detail(&finding, *code, evidence))
            .collect();

        state.findings.insert(finding.id, finding.clone());
        for detail in &details {
            state.details.insert(detail.id, detail.clone());
        }
        if let Some(p) = state.periods.get_mut(&period_id) {
            p.village_count += 1;
            p.flag_count += items.len() as i32;
        }
        Some((finding, details))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWorkSession>> {
        Ok(Box::new(self.create_session()))
    }
}

pub struct MemorySession {
    working: Shared,
    committed: Shared,
    faults: Faults,
    store: Store,
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    fn periods(&self) -> &dyn AtensiPeriodRepository {
        &self.store
    }

    fn findings(&self) -> &dyn VillageFindingRepository {
        &self.store
    }

    fn details(&self) -> &dyn FlagDetailRepository {
        &self.store
    }

    fn history(&self) -> &dyn StatusHistoryRepository {
        &self.store
    }

    fn flag_types(&self) -> &dyn FlagTypeRepository {
        &self.store
    }

    fn villages(&self) -> &dyn VillageRepository {
        &self.store
    }

    fn identification_logs(&self) -> &dyn IdentificationLogRepository {
        &self.store
    }

    fn tenants(&self) -> &dyn TenantRepository {
        &self.store
    }

    fn users(&self) -> &dyn LegacyUserRepository {
        &self.store
    }

    fn admin_sessions(&self) -> &dyn AdminSessionRepository {
        &self.store
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        check_fault(&self.faults, FaultPoint::Commit)?;
        let working = self.working.lock().clone();
        *self.committed.lock() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Repository view over one session's working copy.
struct Store {
    state: Shared,
    faults: Faults,
}

// ---- periods ----

#[async_trait]
impl FindById<AtensiPeriodModel> for Store {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        Ok(self.state.lock().periods.get(&id).cloned())
    }
}

#[async_trait]
impl LoadBatch<AtensiPeriodModel> for Store {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<AtensiPeriodModel>>> {
        let state = self.state.lock();
        Ok(ids.iter().map(|id| state.periods.get(id).cloned()).collect())
    }
}

fn period_key_taken(state: &MemoryState, item: &AtensiPeriodModel) -> bool {
    state
        .periods
        .values()
        .any(|p| p.id != item.id && p.natural_key() == item.natural_key())
}

#[async_trait]
impl CreateBatch<AtensiPeriodModel> for Store {
    async fn create_batch(&self, items: Vec<AtensiPeriodModel>) -> RepositoryResult<Vec<AtensiPeriodModel>> {
        let mut state = self.state.lock();
        for item in &items {
            if state.periods.contains_key(&item.id) || period_key_taken(&state, item) {
                return Err(RepositoryError::Duplicate("uq_cacm_atensi".to_string()));
            }
            state.periods.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<AtensiPeriodModel> for Store {
    async fn update_batch(&self, items: Vec<AtensiPeriodModel>) -> RepositoryResult<Vec<AtensiPeriodModel>> {
        let mut state = self.state.lock();
        for item in &items {
            if period_key_taken(&state, item) {
                return Err(RepositoryError::Duplicate("uq_cacm_atensi".to_string()));
            }
            let Some(existing) = state.periods.get(&item.id).cloned() else {
                continue;
            };
            let mut updated = item.clone();
            updated.is_sent = existing.is_sent;
            if existing.period_number != updated.period_number {
                let renamed = updated.period_number.clone();
                for finding in state.findings.values_mut().filter(|f| f.period_id == item.id) {
                    finding.period_number = renamed.clone();
                }
                for detail in state.details.values_mut().filter(|d| d.period_id == item.id) {
                    detail.period_number = renamed.clone();
                }
            }
            state.periods.insert(item.id, updated);
        }
        Ok(items)
    }
}

#[async_trait]
impl DeleteBatch for Store {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        let mut state = self.state.lock();
        let mut deleted = 0;
        for id in ids {
            if state.periods.remove(id).is_none() {
                continue;
            }
            deleted += 1;
            state.findings.retain(|_, f| f.period_id != *id);
            let removed: HashSet<Uuid> = state
                .details
                .values()
                .filter(|d| d.period_id == *id)
                .map(|d| d.id)
                .collect();
            state.details.retain(|detail_id, _| !removed.contains(detail_id));
            state.history.retain(|h| !removed.contains(&h.detail_id));
        }
        Ok(deleted)
    }
}

#[async_trait]
impl AtensiPeriodRepository for Store {
    async fn find_by_natural_key(
        &self,
        fiscal_year: i32,
        region_code: &str,
        period_number: &str,
    ) -> RepositoryResult<Option<AtensiPeriodModel>> {
        Ok(self
            .state
            .lock()
            .periods
            .values()
            .find(|p| p.natural_key() == (fiscal_year, region_code, period_number))
            .cloned())
    }

    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<AtensiPeriodModel>> {
        Ok(self.state.lock().periods.get(&id).cloned())
    }

    async fn mark_sent(&self, id: Uuid, actor: &str, at: DateTime<Utc>) -> RepositoryResult<bool> {
        check_fault(&self.faults, FaultPoint::MarkSent)?;
        let mut state = self.state.lock();
        match state.periods.get_mut(&id) {
            Some(period) if !period.is_sent => {
                period.is_sent = true;
                period.updated_by = Some(actor.to_string());
                period.updated_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(
        &self,
        fiscal_year: i32,
        region_code: &str,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<AtensiPeriodModel>> {
        let state = self.state.lock();
        let mut matching: Vec<AtensiPeriodModel> = state
            .periods
            .values()
            .filter(|p| p.fiscal_year == fiscal_year && p.region_code.as_str() == region_code)
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.raised_date
                .cmp(&a.raised_date)
                .then_with(|| b.period_number.cmp(&a.period_number))
        });
        Ok(Page::from_all(matching, page))
    }
}

// ---- findings ----

#[async_trait]
impl FindById<VillageFindingModel> for Store {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<VillageFindingModel>> {
        Ok(self.state.lock().findings.get(&id).cloned())
    }
}

#[async_trait]
impl CreateBatch<VillageFindingModel> for Store {
    async fn create_batch(&self, items: Vec<VillageFindingModel>) -> RepositoryResult<Vec<VillageFindingModel>> {
        let mut state = self.state.lock();
        for item in &items {
            let taken = state
                .findings
                .values()
                .any(|f| f.period_id == item.period_id && f.village_code == item.village_code);
            if taken || state.findings.contains_key(&item.id) {
                return Err(RepositoryError::Duplicate("uq_cacm_atensi_desa".to_string()));
            }
            state.findings.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<VillageFindingModel> for Store {
    async fn update_batch(&self, items: Vec<VillageFindingModel>) -> RepositoryResult<Vec<VillageFindingModel>> {
        check_fault(&self.faults, FaultPoint::FindingUpdate)?;
        let mut state = self.state.lock();
        for item in &items {
            if let Some(existing) = state.findings.get_mut(&item.id) {
                existing.follow_up_status = item.follow_up_status;
                existing.verification_status = item.verification_status;
                existing.updated_by = item.updated_by.clone();
                existing.updated_at = item.updated_at;
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl VillageFindingRepository for Store {
    async fn find_by_village(
        &self,
        period_id: Uuid,
        village_code: &str,
    ) -> RepositoryResult<Option<VillageFindingModel>> {
        Ok(self
            .state
            .lock()
            .findings
            .values()
            .find(|f| f.period_id == period_id && f.village_code.as_str() == village_code)
            .cloned())
    }

    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<VillageFindingModel>> {
        let state = self.state.lock();
        let mut findings: Vec<VillageFindingModel> = state
            .findings
            .values()
            .filter(|f| f.period_id == period_id)
            .cloned()
            .collect();
        findings.sort_by(|a, b| a.village_code.cmp(&b.village_code));
        Ok(findings)
    }

    async fn list_by_village(
        &self,
        fiscal_year: i32,
        village_code: &str,
        status: FollowUpStatus,
    ) -> RepositoryResult<Vec<VillageFindingModel>> {
        let state = self.state.lock();
        let mut rows: Vec<(NaiveDate, VillageFindingModel)> = state
            .findings
            .values()
            .filter(|f| {
                f.fiscal_year == fiscal_year
                    && f.village_code.as_str() == village_code
                    && f.follow_up_status == status
            })
            .filter_map(|f| {
                state
                    .periods
                    .get(&f.period_id)
                    .map(|p| (p.raised_date, f.clone()))
            })
            .collect();
        rows.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.period_number.cmp(&a.1.period_number))
        });
        Ok(rows.into_iter().map(|(_, f)| f).collect())
    }

    async fn increment_counters(&self, id: Uuid, flag_delta: i32, resolved_delta: i32) -> RepositoryResult<()> {
        let mut state = self.state.lock();
        if let Some(finding) = state.findings.get_mut(&id) {
            finding.flag_count += flag_delta;
            finding.resolved_count += resolved_delta;
        }
        Ok(())
    }
}

// ---- details ----

#[async_trait]
impl FindById<FlagDetailModel> for Store {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>> {
        Ok(self.state.lock().details.get(&id).cloned())
    }
}

#[async_trait]
impl CreateBatch<FlagDetailModel> for Store {
    async fn create_batch(&self, items: Vec<FlagDetailModel>) -> RepositoryResult<Vec<FlagDetailModel>> {
        let mut state = self.state.lock();
        for item in &items {
            let taken = state.details.values().any(|d| {
                d.finding_id == item.finding_id
                    && d.flag_type_code == item.flag_type_code
                    && d.evidence_number == item.evidence_number
            });
            if taken || state.details.contains_key(&item.id) {
                return Err(RepositoryError::Duplicate("uq_cacm_atensi_desa_rinc".to_string()));
            }
            state.details.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<FlagDetailModel> for Store {
    async fn update_batch(&self, items: Vec<FlagDetailModel>) -> RepositoryResult<Vec<FlagDetailModel>> {
        check_fault(&self.faults, FaultPoint::DetailUpdate)?;
        let mut state = self.state.lock();
        for item in &items {
            if let Some(existing) = state.details.get_mut(&item.id) {
                existing.follow_up_status = item.follow_up_status;
                existing.verification_status = item.verification_status;
                existing.responder_name = item.responder_name.clone();
                existing.responder_comment = item.responder_comment.clone();
                existing.attached_file_name = item.attached_file_name.clone();
                existing.updated_by = item.updated_by.clone();
                existing.updated_at = item.updated_at;
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl FlagDetailRepository for Store {
    async fn find_by_natural_key(
        &self,
        finding_id: Uuid,
        flag_type_code: i32,
        evidence_number: &str,
    ) -> RepositoryResult<Option<FlagDetailModel>> {
        Ok(self
            .state
            .lock()
            .details
            .values()
            .find(|d| {
                d.finding_id == finding_id
                    && d.flag_type_code == flag_type_code
                    && d.evidence_number.as_str() == evidence_number
            })
            .cloned())
    }

    async fn list_by_period(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        let state = self.state.lock();
        let mut details: Vec<FlagDetailModel> = state
            .details
            .values()
            .filter(|d| d.period_id == period_id)
            .cloned()
            .collect();
        details.sort_by(|a, b| {
            (&a.village_code, a.flag_type_code, &a.evidence_number).cmp(&(
                &b.village_code,
                b.flag_type_code,
                &b.evidence_number,
            ))
        });
        Ok(details)
    }

    async fn find_for_update(&self, id: Uuid) -> RepositoryResult<Option<FlagDetailModel>> {
        self.find_by_id(id).await
    }

    async fn list_by_period_for_update(&self, period_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        FlagDetailRepository::list_by_period(self, period_id).await
    }

    async fn list_by_finding(&self, finding_id: Uuid) -> RepositoryResult<Vec<FlagDetailModel>> {
        let state = self.state.lock();
        let mut details: Vec<FlagDetailModel> = state
            .details
            .values()
            .filter(|d| d.finding_id == finding_id)
            .cloned()
            .collect();
        details.sort_by(|a, b| {
            (a.flag_type_code, &a.evidence_number).cmp(&(b.flag_type_code, &b.evidence_number))
        });
        Ok(details)
    }

    async fn list_by_village_statuses(
        &self,
        fiscal_year: i32,
        village_code: &str,
        statuses: &[FollowUpStatus],
    ) -> RepositoryResult<Vec<FlagDetailModel>> {
        let state = self.state.lock();
        let mut details: Vec<FlagDetailModel> = state
            .details
            .values()
            .filter(|d| {
                d.fiscal_year == fiscal_year
                    && d.village_code.as_str() == village_code
                    && statuses.contains(&d.follow_up_status)
            })
            .cloned()
            .collect();
        details.sort_by(|a, b| {
            (&a.period_number, a.flag_type_code, &a.evidence_number).cmp(&(
                &b.period_number,
                b.flag_type_code,
                &b.evidence_number,
            ))
        });
        Ok(details)
    }

    async fn distinct_flag_types(&self, period_id: Uuid) -> RepositoryResult<Vec<i32>> {
        let state = self.state.lock();
        let mut codes: Vec<i32> = state
            .details
            .values()
            .filter(|d| d.period_id == period_id)
            .map(|d| d.flag_type_code)
            .collect();
        codes.sort_unstable();
        codes.dedup();
        Ok(codes)
    }
}

// ---- history ----

#[async_trait]
impl CreateBatch<StatusTransitionModel> for Store {
    async fn create_batch(&self, items: Vec<StatusTransitionModel>) -> RepositoryResult<Vec<StatusTransitionModel>> {
        check_fault(&self.faults, FaultPoint::HistoryAppend)?;
        self.state.lock().history.extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl StatusHistoryRepository for Store {
    async fn latest_hashes(&self, detail_ids: &[Uuid]) -> RepositoryResult<HashMap<Uuid, i64>> {
        let wanted: HashSet<&Uuid> = detail_ids.iter().collect();
        let mut latest = HashMap::new();
        for entry in self.state.lock().history.iter() {
            if wanted.contains(&entry.detail_id) {
                latest.insert(entry.detail_id, entry.hash);
            }
        }
        Ok(latest)
    }

    async fn list_by_detail(&self, detail_id: Uuid) -> RepositoryResult<Vec<StatusTransitionModel>> {
        Ok(self.state.lock().history_of(detail_id))
    }
}

// ---- reference data ----

#[async_trait]
impl FlagTypeRepository for Store {
    async fn load_by_codes(&self, codes: &[i32]) -> RepositoryResult<Vec<FlagTypeModel>> {
        let state = self.state.lock();
        Ok(state
            .flag_types
            .values()
            .filter(|t| codes.contains(&t.code))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VillageRepository for Store {
    async fn load_names(&self, village_codes: &[String]) -> RepositoryResult<HashMap<String, String>> {
        let state = self.state.lock();
        Ok(village_codes
            .iter()
            .filter_map(|code| state.villages.get(code).map(|name| (code.clone(), name.clone())))
            .collect())
    }
}

#[async_trait]
impl IdentificationLogRepository for Store {
    async fn latest(&self, fiscal_year: i32, region_code: &str) -> RepositoryResult<Option<IdentificationLogModel>> {
        Ok(self
            .state
            .lock()
            .identification_logs
            .iter()
            .filter(|l| l.fiscal_year == fiscal_year && l.region_code.as_str() == region_code)
            .max_by_key(|l| l.last_update)
            .cloned())
    }
}

#[async_trait]
impl FindById<TenantModel> for Store {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TenantModel>> {
        Ok(self.state.lock().tenants.get(&id).cloned())
    }
}

impl TenantRepository for Store {}

#[async_trait]
impl LegacyUserRepository for Store {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<LegacyUserModel>> {
        Ok(self.state.lock().users.get(username).cloned())
    }

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> RepositoryResult<()> {
        let mut state = self.state.lock();
        if let Some(user) = state.users.values_mut().find(|u| u.id == user_id) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl CreateBatch<AdminSessionModel> for Store {
    async fn create_batch(&self, items: Vec<AdminSessionModel>) -> RepositoryResult<Vec<AdminSessionModel>> {
        let mut state = self.state.lock();
        for item in &items {
            state.admin_sessions.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl AdminSessionRepository for Store {
    async fn update_fiscal_year(&self, session_id: Uuid, fiscal_year: i32) -> RepositoryResult<bool> {
        let mut state = self.state.lock();
        match state.admin_sessions.get_mut(&session_id) {
            Some(session) => {
                session.fiscal_year = Some(fiscal_year);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---- procedures ----

/// Records procedure calls and answers with canned results.
#[derive(Clone, Default)]
pub struct StubProcedures {
    calls: Arc<Mutex<Vec<String>>>,
    login_result: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    archive: Arc<Mutex<Option<PendingArchive>>>,
    documents: Arc<Mutex<Option<InMemoryUnitOfWork>>>,
}

#[derive(Clone)]
struct PendingArchive {
    uow: InMemoryUnitOfWork,
    period_id: Uuid,
    rows: Vec<(String, Vec<(i32, String)>)>,
}

impl StubProcedures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_result(result: impl Into<String>) -> Self {
        let stub = Self::default();
        *stub.login_result.lock() = Some(result.into());
        stub
    }

    /// Make every call fail with a backend error.
    pub fn fail_with(&self, detail: impl Into<String>) {
        *self.failure.lock() = Some(detail.into());
    }

    pub fn delay_by(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// The next archive call writes these rows into `period_id`.
    pub fn archive_into(
        &self,
        uow: &InMemoryUnitOfWork,
        period_id: Uuid,
        rows: Vec<(&str, Vec<(i32, &str)>)>,
    ) {
        let rows = rows
            .into_iter()
            .map(|(village, items)| {
                (
                    village.to_string(),
                    items.into_iter().map(|(c, e)| (c, e.to_string())).collect(),
                )
            })
            .collect();
        *self.archive.lock() = Some(PendingArchive {
            uow: uow.clone(),
            period_id,
            rows,
        });
    }

    /// Documentation calls create their period in `uow`.
    pub fn document_into(&self, uow: &InMemoryUnitOfWork) {
        *self.documents.lock() = Some(uow.clone());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    async fn enter(&self, call: String) -> RepositoryResult<()> {
        self.calls.lock().push(call);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().clone() {
            Some(detail) => Err(RepositoryError::Backend(detail)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RedFlagProcedures for StubProcedures {
    async fn check_red_flags(&self, as_of: NaiveDate) -> RepositoryResult<()> {
        self.enter(format!("sp_cek_redflags({as_of})")).await
    }

    async fn archive_red_flags(&self) -> RepositoryResult<()> {
        self.enter("sp_arsipkan_redflags()".to_string()).await?;
        let pending = self.archive.lock().take();
        if let Some(pending) = pending {
            for (village, items) in &pending.rows {
                let items: Vec<(i32, &str)> = items.iter().map(|(c, e)| (*c, e.as_str())).collect();
                pending.uow.archive_snapshot(pending.period_id, village, &items);
            }
        }
        Ok(())
    }

    async fn document_red_flags(&self, call: &DocumentationCall) -> RepositoryResult<()> {
        self.enter(format!(
            "sp_cacm_redflag_dokumentasi({}, {}, {})",
            call.fiscal_year, call.region_code, call.period_number
        ))
        .await?;
        let target = self.documents.lock().clone();
        if let Some(uow) = target {
            let mut period = sample_period(call.fiscal_year, &call.region_code, &call.period_number);
            period.raised_date = call.raised_date;
            period.cutoff_date = call.cutoff_date;
            period.note = call.note.clone();
            period.created_by = Some(call.actor.clone());
            uow.seed(|s| {
                s.periods.insert(period.id, period);
            });
        }
        Ok(())
    }

    async fn refresh_follow_up(&self, village_code: &str, fiscal_year: i32) -> RepositoryResult<()> {
        self.enter(format!("sp_refresh_tl({village_code}, {fiscal_year})")).await
    }
}

#[async_trait]
impl LegacyLoginProcedure for StubProcedures {
    async fn login_user_siskeudes(&self, call: &LegacyLoginCall) -> RepositoryResult<Option<String>> {
        self.enter(format!("sp_login_usersiskeudes({}, {})", call.fiscal_year, call.username))
            .await?;
        Ok(self.login_result.lock().clone())
    }
}

// ---- fixtures ----

pub fn code<const N: usize>(value: &str) -> heapless::String<N> {
    heapless::String::from_str(value).expect("fixture code fits its capacity")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

pub fn sample_period(fiscal_year: i32, region_code: &str, period_number: &str) -> AtensiPeriodModel {
    AtensiPeriodModel {
        id: Uuid::new_v4(),
        fiscal_year,
        region_code: code(region_code),
        period_number: code(period_number),
        raised_date: date(fiscal_year, 1, 10),
        cutoff_date: date(fiscal_year, 1, 5),
        note: None,
        village_count: 0,
        flag_count: 0,
        resolved_count: 0,
        is_sent: false,
        created_by: Some("fixture".to_string()),
        created_at: None,
        updated_by: None,
        updated_at: None,
    }
}

pub fn sample_finding(period: &AtensiPeriodModel, village_code: &str) -> VillageFindingModel {
    VillageFindingModel {
        id: Uuid::new_v4(),
        period_id: period.id,
        fiscal_year: period.fiscal_year,
        region_code: period.region_code.clone(),
        period_number: period.period_number.clone(),
        village_code: code(village_code),
        flag_count: 0,
        resolved_count: 0,
        follow_up_status: FollowUpStatus::New,
        verification_status: VerificationStatus::Pending,
        updated_by: None,
        updated_at: None,
    }
}

pub fn sample_detail(finding: &VillageFindingModel, flag_type_code: i32, evidence_number: &str) -> FlagDetailModel {
    FlagDetailModel {
        id: Uuid::new_v4(),
        finding_id: finding.id,
        period_id: finding.period_id,
        fiscal_year: finding.fiscal_year,
        region_code: finding.region_code.clone(),
        period_number: finding.period_number.clone(),
        village_code: finding.village_code.clone(),
        flag_type_code,
        evidence_number: code(evidence_number),
        evidence_date: None,
        evidence_description: None,
        standard_date: None,
        actual_date: None,
        date_difference: None,
        standard_value: None,
        actual_value: None,
        percentage: None,
        difference: None,
        is_red_flag: true,
        follow_up_status: FollowUpStatus::New,
        verification_status: VerificationStatus::Pending,
        responder_name: None,
        responder_comment: None,
        attached_file_name: None,
        updated_by: None,
        updated_at: None,
    }
}

pub fn sample_flag_type(code: i32, name: &str) -> FlagTypeModel {
    FlagTypeModel {
        code,
        name: name.to_string(),
        abbreviation: None,
        criteria: None,
        unit: None,
        standard_caption: None,
        actual_caption: None,
        difference_caption: None,
    }
}

pub fn sample_tenant(code: &str) -> TenantModel {
    TenantModel {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: format!("Pemda {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_session_leaves_no_trace() {
        let uow = InMemoryUnitOfWork::new();
        let period = sample_period(2025, "1234", "001");
        {
            let session = uow.begin().await.unwrap();
            session.periods().create_batch(vec![period.clone()]).await.unwrap();
            assert!(session.periods().find_by_id(period.id).await.unwrap().is_some());
        }
        assert!(uow.snapshot().periods.is_empty());

        let session = uow.begin().await.unwrap();
        session.periods().create_batch(vec![period.clone()]).await.unwrap();
        session.commit().await.unwrap();
        assert!(uow.snapshot().periods.contains_key(&period.id));
    }

    #[tokio::test]
    async fn rename_cascades_to_children() {
        let uow = InMemoryUnitOfWork::new();
        let period = sample_period(2025, "1234", "001");
        uow.seed(|s| {
            s.periods.insert(period.id, period.clone());
        });
        let (finding, details) = uow.archive_snapshot(period.id, "320101200100", &[(10, "B-1")]).unwrap();

        let session = uow.begin().await.unwrap();
        let mut renamed = period.clone();
        renamed.period_number = code("002");
        session.periods().update_batch(vec![renamed]).await.unwrap();
        session.commit().await.unwrap();

        let state = uow.snapshot();
        assert_eq!(state.findings[&finding.id].period_number.as_str(), "002");
        assert_eq!(state.details[&details[0].id].period_number.as_str(), "002");
    }
}
