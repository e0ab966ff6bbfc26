use chrono::{DateTime, Utc};
use uuid::Uuid;

/// # Documentation
/// - Admin user row joined with its role and tenant, read through raw SQL.
/// - `password_hash` is a PHC string; it is never serialized.
/// - `permissions_json` is the role's capability list as a JSON-encoded array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyUserModel {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub active: bool,
    pub role_name: String,
    pub role_code: String,
    pub permissions_json: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub tenant_name: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}
