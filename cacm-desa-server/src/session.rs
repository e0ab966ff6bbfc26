//! Signed session tokens for the admin and village namespaces.
//!
//! Each namespace has its own secret, cookie name and cookie path, so a
//! browser holding both sessions never presents one to the other's routes.
//! Tokens are HS256 JWTs; clients may also send them as `Bearer` tokens.

use axum::http::{header, HeaderMap, HeaderValue};
use cacm_desa_api::domain::{AdminIdentity, MobileIdentity};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const ADMIN_COOKIE: &str = "cacm_desa.session-token";
pub const ADMIN_COOKIE_PATH: &str = "/api";
pub const MOBILE_COOKIE: &str = "cacm_desa_mobile.session-token";
pub const MOBILE_COOKIE_PATH: &str = "/mobile";

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session configuration: {0}")]
    Config(String),
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Registered claims around a namespace payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub payload: T,
    pub iat: u64,
    pub exp: u64,
}

/// Admin tokens carry the identity at the top level.
pub type AdminClaims = Claims<AdminIdentity>;

/// Village tokens nest the identity under `mobile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilePayload {
    pub mobile: MobileIdentity,
}

pub type MobileClaims = Claims<MobilePayload>;

/// Issues and checks the tokens of one namespace.
#[derive(Clone)]
pub struct SessionIssuer {
    secret: String,
    lifetime: Duration,
    cookie_name: &'static str,
    cookie_path: &'static str,
    secure: bool,
}

impl SessionIssuer {
    pub fn new(
        secret: impl Into<String>,
        lifetime: Duration,
        cookie_name: &'static str,
        cookie_path: &'static str,
        secure: bool,
    ) -> Result<Self, SessionError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionError::Config(format!(
                "{cookie_name} secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        Ok(Self {
            secret,
            lifetime,
            cookie_name,
            cookie_path,
            secure,
        })
    }

    pub fn admin(secret: impl Into<String>, lifetime: Duration, secure: bool) -> Result<Self, SessionError> {
        Self::new(secret, lifetime, ADMIN_COOKIE, ADMIN_COOKIE_PATH, secure)
    }

    pub fn mobile(secret: impl Into<String>, lifetime: Duration, secure: bool) -> Result<Self, SessionError> {
        Self::new(secret, lifetime, MOBILE_COOKIE, MOBILE_COOKIE_PATH, secure)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign `payload` with a fresh absolute expiry.
    pub fn issue<T: Serialize>(&self, payload: T) -> Result<String, SessionError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SessionError::Signing(format!("system time error: {e}")))?
            .as_secs();
        let claims = Claims {
            payload,
            iat: now,
            exp: now + self.lifetime.as_secs(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SessionError::Signing(e.to_string()))
    }

    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, SessionError> {
        decode::<Claims<T>>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            ErrorKind::InvalidSignature => SessionError::Invalid("signature".to_string()),
            _ => SessionError::Invalid(err.to_string()),
        })
    }

    /// `Bearer` header first, then this namespace's cookie.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let authorization = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        if let Some(token) = extract_bearer_token(authorization) {
            return Some(token.to_string());
        }
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|cookies| cookie_value(cookies, self.cookie_name))
            .map(str::to_string)
    }

    pub fn session_cookie(&self, token: &str) -> Result<HeaderValue, SessionError> {
        self.cookie(token, self.lifetime.as_secs())
    }

    pub fn clearing_cookie(&self) -> Result<HeaderValue, SessionError> {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: u64) -> Result<HeaderValue, SessionError> {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie_name, value, self.cookie_path, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).map_err(|e| SessionError::Signing(e.to_string()))
    }
}

/// Token of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let token = auth_header?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacm_desa_api::domain::PermissionSet;
    use cacm_desa_core::test_helper::code;
    use uuid::Uuid;

    const ADMIN_SECRET: &str = "admin-secret-that-is-at-least-32-characters";
    const MOBILE_SECRET: &str = "mobile-secret-that-is-at-least-32-characters";

    fn admin_identity() -> AdminIdentity {
        AdminIdentity {
            user_id: Uuid::new_v4(),
            username: "operator".into(),
            name: "Operator".into(),
            role: "Admin Pemda".into(),
            role_code: "ADM".into(),
            permissions: PermissionSet::new(["atensi.kirim"]),
            tenant_id: Some(Uuid::new_v4()),
            tenant_name: "Pemda 1234".into(),
            fiscal_year: Some(2025),
            session_id: Uuid::new_v4(),
        }
    }

    fn mobile_identity() -> MobileIdentity {
        MobileIdentity {
            username: "bendahara".into(),
            village_code: code("123401200100"),
            village_name: String::new(),
            fiscal_year: 2025,
            region_code: code("1234"),
        }
    }

    fn issuers() -> (SessionIssuer, SessionIssuer) {
        (
            SessionIssuer::admin(ADMIN_SECRET, Duration::from_secs(8 * 3600), false).unwrap(),
            SessionIssuer::mobile(MOBILE_SECRET, Duration::from_secs(8 * 3600), true).unwrap(),
        )
    }

    #[test]
    fn admin_token_carries_identity_and_expiry() {
        let (admin, _) = issuers();
        let identity = admin_identity();
        let token = admin.issue(identity.clone()).unwrap();

        let claims: AdminClaims = admin.verify(&token).unwrap();
        assert_eq!(claims.payload, identity);
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn mobile_identity_is_nested() {
        let (_, mobile) = issuers();
        let token = mobile
            .issue(MobilePayload {
                mobile: mobile_identity(),
            })
            .unwrap();
        let claims: MobileClaims = mobile.verify(&token).unwrap();
        assert_eq!(claims.payload.mobile.village_code.as_str(), "123401200100");

        let raw = serde_json::to_value(&claims).unwrap();
        assert_eq!(raw["mobile"]["villageCode"], "123401200100");
    }

    #[test]
    fn tokens_do_not_cross_namespaces() {
        let (admin, mobile) = issuers();
        let admin_token = admin.issue(admin_identity()).unwrap();
        assert!(mobile.verify::<MobilePayload>(&admin_token).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{ADMIN_COOKIE}={admin_token}; theme=dark")).unwrap(),
        );
        assert_eq!(admin.token_from_headers(&headers), Some(admin_token));
        assert_eq!(mobile.token_from_headers(&headers), None);
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let (admin, _) = issuers();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(header::COOKIE, HeaderValue::from_static("cacm_desa.session-token=zzz"));
        assert_eq!(admin.token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));

        assert_eq!(extract_bearer_token(Some("Bearer ")), None);
        assert_eq!(extract_bearer_token(Some("Basic abc")), None);
        assert_eq!(extract_bearer_token(None), None);
    }

    #[test]
    fn cookies_are_scoped_to_their_path() {
        let (admin, mobile) = issuers();
        let cookie = admin.session_cookie("t0k3n").unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("cacm_desa.session-token=t0k3n; Path=/api;"));
        assert!(cookie.contains("Max-Age=28800"));
        assert!(!cookie.contains("Secure"));

        let cleared = mobile.clearing_cookie().unwrap();
        let cleared = cleared.to_str().unwrap();
        assert!(cleared.starts_with("cacm_desa_mobile.session-token=; Path=/mobile;"));
        assert!(cleared.contains("Max-Age=0"));
        assert!(cleared.ends_with("; Secure"));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            SessionIssuer::admin("short", Duration::from_secs(60), false),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let (admin, _) = issuers();
        let token = admin.issue(admin_identity()).unwrap();
        let tampered = format!("{token}x");
        assert!(matches!(
            admin.verify::<AdminIdentity>(&tampered),
            Err(SessionError::Invalid(_))
        ));
    }
}
