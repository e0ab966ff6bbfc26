use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - Server-side tracking row created at admin sign-in.
/// - Not the signed token: the token is self-contained, this row is for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fiscal_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Identifiable for AdminSessionModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
