use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::RepositoryResult;
use crate::models::LegacyUserModel;

/// Admin user lookup against the legacy user, role and tenant tables.
#[async_trait]
pub trait LegacyUserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<LegacyUserModel>>;

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> RepositoryResult<()>;
}
