use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::codes::{RegionCode, VillageCode};

/// Capability strings granted to an admin role.
///
/// Roles store their permissions as a JSON-encoded string array. A blob that
/// does not parse grants nothing: [`PermissionSet::from_json_or_empty`] is the
/// intended degrade path, the caller decides whether to log it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let list: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::new(list))
    }

    /// Parse the stored blob; a malformed or absent blob yields the empty set.
    pub fn from_json_or_empty(raw: Option<&str>) -> (Self, bool) {
        match raw.map(Self::from_json) {
            Some(Ok(set)) => (set, false),
            Some(Err(_)) => (Self::default(), true),
            None => (Self::default(), false),
        }
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Identity carried by an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    pub role_code: String,
    pub permissions: PermissionSet,
    pub tenant_id: Option<Uuid>,
    pub tenant_name: String,
    /// Fiscal year chosen at sign-in or switched later; `None` means the current year.
    pub fiscal_year: Option<i32>,
    /// Server-side tracking row created at sign-in.
    pub session_id: Uuid,
}

/// Identity carried by a village (mobile) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileIdentity {
    pub username: String,
    pub village_code: VillageCode,
    pub village_name: String,
    pub fiscal_year: i32,
    pub region_code: RegionCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_parse_from_json_array() {
        let (set, malformed) = PermissionSet::from_json_or_empty(Some(r#"["atensi.read","atensi.kirim"]"#));
        assert!(!malformed);
        assert!(set.contains("atensi.kirim"));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn malformed_permissions_degrade_to_empty() {
        let (set, malformed) = PermissionSet::from_json_or_empty(Some("{not json"));
        assert!(malformed);
        assert!(set.is_empty());

        let (set, malformed) = PermissionSet::from_json_or_empty(Some(r#"{"all":true}"#));
        assert!(malformed);
        assert!(set.is_empty());

        let (set, malformed) = PermissionSet::from_json_or_empty(None);
        assert!(!malformed);
        assert!(set.is_empty());
    }
}
