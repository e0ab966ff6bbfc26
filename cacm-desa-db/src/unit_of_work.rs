//! Transaction boundary shared by every workflow operation.
//!
//! A [`UnitOfWorkSession`] wraps one database transaction. Every repository it
//! hands out works on that transaction, so a multi-step operation either
//! commits as a whole or leaves no trace. Dropping a session without calling
//! [`UnitOfWorkSession::commit`] rolls it back.

use async_trait::async_trait;

use crate::repository::{
    AdminSessionRepository, AtensiPeriodRepository, FlagDetailRepository, FlagTypeRepository,
    IdentificationLogRepository, LegacyUserRepository, RepositoryResult, StatusHistoryRepository,
    TenantRepository, VillageFindingRepository, VillageRepository,
};

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWorkSession>>;
}

#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    fn periods(&self) -> &dyn AtensiPeriodRepository;
    fn findings(&self) -> &dyn VillageFindingRepository;
    fn details(&self) -> &dyn FlagDetailRepository;
    fn history(&self) -> &dyn StatusHistoryRepository;
    fn flag_types(&self) -> &dyn FlagTypeRepository;
    fn villages(&self) -> &dyn VillageRepository;
    fn identification_logs(&self) -> &dyn IdentificationLogRepository;
    fn tenants(&self) -> &dyn TenantRepository;
    fn users(&self) -> &dyn LegacyUserRepository;
    fn admin_sessions(&self) -> &dyn AdminSessionRepository;

    async fn commit(self: Box<Self>) -> RepositoryResult<()>;

    async fn rollback(self: Box<Self>) -> RepositoryResult<()>;
}
