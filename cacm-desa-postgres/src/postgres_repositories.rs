use async_trait::async_trait;
use cacm_desa_db::repository::{
    AdminSessionRepository, AtensiPeriodRepository, FlagDetailRepository, FlagTypeRepository,
    IdentificationLogRepository, LegacyUserRepository, RepositoryError, RepositoryResult, StatusHistoryRepository,
    TenantRepository, VillageFindingRepository, VillageRepository,
};
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use postgres_unit_of_work::Executor;
use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::access::{
    AdminSessionRepositoryImpl, LegacyUserRepositoryImpl, TenantRepositoryImpl, VillageRepositoryImpl,
};
use crate::repository::atensi::{
    AtensiPeriodRepositoryImpl, FlagDetailRepositoryImpl, FlagTypeRepositoryImpl,
    IdentificationLogRepositoryImpl, StatusHistoryRepositoryImpl, VillageFindingRepositoryImpl,
};

/// Opens transactional sessions over a shared pool.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    /// Create all repositories sharing a single transaction.
    pub async fn create_session(&self) -> RepositoryResult<PostgresSession> {
        let tx = self.pool.begin().await?;
        Ok(PostgresSession::new(Executor::new(tx)))
    }
}

#[async_trait]
impl UnitOfWork for PostgresRepositories {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWorkSession>> {
        Ok(Box::new(self.create_session().await?))
    }
}

/// Every repository of one transaction.
///
/// The transaction is rolled back when the last executor clone is dropped
/// without a commit.
pub struct PostgresSession {
    executor: Executor,
    pub period_repository: Arc<AtensiPeriodRepositoryImpl>,
    pub finding_repository: Arc<VillageFindingRepositoryImpl>,
    pub detail_repository: Arc<FlagDetailRepositoryImpl>,
    pub history_repository: Arc<StatusHistoryRepositoryImpl>,
    pub flag_type_repository: Arc<FlagTypeRepositoryImpl>,
    pub village_repository: Arc<VillageRepositoryImpl>,
    pub identification_log_repository: Arc<IdentificationLogRepositoryImpl>,
    pub tenant_repository: Arc<TenantRepositoryImpl>,
    pub user_repository: Arc<LegacyUserRepositoryImpl>,
    pub admin_session_repository: Arc<AdminSessionRepositoryImpl>,
}

impl PostgresSession {
    pub fn new(executor: Executor) -> Self {
        Self {
            period_repository: Arc::new(AtensiPeriodRepositoryImpl::new(executor.clone())),
            finding_repository: Arc::new(VillageFindingRepositoryImpl::new(executor.clone())),
            detail_repository: Arc::new(FlagDetailRepositoryImpl::new(executor.clone())),
            history_repository: Arc::new(StatusHistoryRepositoryImpl::new(executor.clone())),
            flag_type_repository: Arc::new(FlagTypeRepositoryImpl::new(executor.clone())),
            village_repository: Arc::new(VillageRepositoryImpl::new(executor.clone())),
            identification_log_repository: Arc::new(IdentificationLogRepositoryImpl::new(
                executor.clone(),
            )),
            tenant_repository: Arc::new(TenantRepositoryImpl::new(executor.clone())),
            user_repository: Arc::new(LegacyUserRepositoryImpl::new(executor.clone())),
            admin_session_repository: Arc::new(AdminSessionRepositoryImpl::new(executor.clone())),
            executor,
        }
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    fn periods(&self) -> &dyn AtensiPeriodRepository {
        self.period_repository.as_ref()
    }

    fn findings(&self) -> &dyn VillageFindingRepository {
        self.finding_repository.as_ref()
    }

    fn details(&self) -> &dyn FlagDetailRepository {
        self.detail_repository.as_ref()
    }

    fn history(&self) -> &dyn StatusHistoryRepository {
        self.history_repository.as_ref()
    }

    fn flag_types(&self) -> &dyn FlagTypeRepository {
        self.flag_type_repository.as_ref()
    }

    fn villages(&self) -> &dyn VillageRepository {
        self.village_repository.as_ref()
    }

    fn identification_logs(&self) -> &dyn IdentificationLogRepository {
        self.identification_log_repository.as_ref()
    }

    fn tenants(&self) -> &dyn TenantRepository {
        self.tenant_repository.as_ref()
    }

    fn users(&self) -> &dyn LegacyUserRepository {
        self.user_repository.as_ref()
    }

    fn admin_sessions(&self) -> &dyn AdminSessionRepository {
        self.admin_session_repository.as_ref()
    }

    /// Any repository still holding an executor clone fails with
    /// [`RepositoryError::TransactionConsumed`] afterwards.
    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let tx = self
            .executor
            .tx
            .lock()
            .await
            .take()
            .ok_or(RepositoryError::TransactionConsumed)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
        let tx = self
            .executor
            .tx
            .lock()
            .await
            .take()
            .ok_or(RepositoryError::TransactionConsumed)?;
        tx.rollback().await?;
        Ok(())
    }
}
