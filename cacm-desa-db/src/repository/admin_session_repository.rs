use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use super::CreateBatch;
use crate::models::AdminSessionModel;

#[async_trait]
pub trait AdminSessionRepository: CreateBatch<AdminSessionModel> + Send + Sync {
    /// Returns false when the session row does not exist.
    async fn update_fiscal_year(&self, session_id: Uuid, fiscal_year: i32) -> RepositoryResult<bool>;
}
