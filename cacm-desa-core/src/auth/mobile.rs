use async_trait::async_trait;
use cacm_desa_api::domain::{parse_code, MobileIdentity, RegionCode, VillageCode, VILLAGE_CODE_LEN};
use cacm_desa_api::error::{ApiError, AuthError};
use cacm_desa_api::requests::MobileLoginRequest;
use cacm_desa_api::service::CredentialValidator;
use cacm_desa_db::repository::{LegacyLoginCall, LegacyLoginProcedure};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use super::invalid_input;
use crate::procedure::call_with_timeout;

/// Server-held keys forwarded to the legacy login procedure.
#[derive(Clone)]
pub struct ObfuscationKeys {
    pub user_key: String,
    pub password_key: String,
}

impl std::fmt::Debug for ObfuscationKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ObfuscationKeys(..)")
    }
}

/// How the single `result` column of the login procedure reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Village(VillageCode),
    Rejected(String),
    Empty,
}

/// The procedure answers with a village code on success and a
/// human-readable reason otherwise, in the same column.
///
/// Separators (`.`, `-`, whitespace) are stripped; if only twelve digits
/// remain the sign-in succeeded. Any other text is the rejection reason,
/// returned trimmed but otherwise verbatim.
pub fn interpret_login_result(raw: &str) -> LoginOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LoginOutcome::Empty;
    }

    let code_like = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_whitespace());
    if code_like {
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == VILLAGE_CODE_LEN {
            if let Ok(code) = VillageCode::from_str(&digits) {
                return LoginOutcome::Village(code);
            }
        }
    }
    LoginOutcome::Rejected(trimmed.to_string())
}

/// Village sign-in through `sp_login_usersiskeudes`.
#[derive(Clone)]
pub struct MobileCredentialValidator {
    procedure: Arc<dyn LegacyLoginProcedure>,
    keys: ObfuscationKeys,
    timeout: Duration,
}

impl MobileCredentialValidator {
    pub fn new(procedure: Arc<dyn LegacyLoginProcedure>, keys: ObfuscationKeys, timeout: Duration) -> Self {
        Self {
            procedure,
            keys,
            timeout,
        }
    }
}

#[async_trait]
impl CredentialValidator for MobileCredentialValidator {
    type Credentials = MobileLoginRequest;
    type Identity = MobileIdentity;

    #[tracing::instrument(skip_all, fields(user = %credentials.username.trim(), region_code = %credentials.region_code.trim()))]
    async fn authenticate(&self, credentials: MobileLoginRequest) -> Result<MobileIdentity, AuthError> {
        let credentials = MobileLoginRequest {
            username: credentials.username.trim().to_string(),
            password: credentials.password.trim().to_string(),
            fiscal_year: credentials.fiscal_year.trim().to_string(),
            region_code: credentials.region_code.trim().to_string(),
        };
        credentials.validate().map_err(invalid_input)?;

        let region_code: RegionCode = parse_code("region_code", &credentials.region_code).map_err(|e| match e {
            ApiError::ValidationError { field, message } => AuthError::InvalidInput { field, message },
            other => AuthError::Upstream(other.to_string()),
        })?;
        let fiscal_year: i32 = credentials.fiscal_year.parse().map_err(|_| AuthError::InvalidInput {
            field: "fiscal_year".to_string(),
            message: "expected a 4-digit year".to_string(),
        })?;

        let call = LegacyLoginCall {
            fiscal_year: credentials.fiscal_year.clone(),
            region_code: region_code.to_string(),
            username: credentials.username.clone(),
            password: credentials.password,
            user_key: self.keys.user_key.clone(),
            password_key: self.keys.password_key.clone(),
        };
        let result = call_with_timeout(
            "sp_login_usersiskeudes",
            self.timeout,
            self.procedure.login_user_siskeudes(&call),
        )
        .await
        .map_err(|e| AuthError::Upstream(e.to_string()))?;

        match interpret_login_result(result.as_deref().unwrap_or_default()) {
            LoginOutcome::Village(village_code) => {
                tracing::info!(%village_code, "village signed in");
                Ok(MobileIdentity {
                    username: credentials.username,
                    village_code,
                    village_name: String::new(),
                    fiscal_year,
                    region_code,
                })
            }
            LoginOutcome::Rejected(reason) => {
                tracing::warn!(%reason, "sign-in rejected by login procedure");
                Err(AuthError::Rejected(reason))
            }
            LoginOutcome::Empty => {
                tracing::error!("login procedure returned no result");
                Err(AuthError::Upstream("login procedure returned no result".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::StubProcedures;

    fn keys() -> ObfuscationKeys {
        ObfuscationKeys {
            user_key: "key-user".into(),
            password_key: "key-pwd".into(),
        }
    }

    fn request(fiscal_year: &str) -> MobileLoginRequest {
        MobileLoginRequest {
            username: "bendahara".into(),
            password: "rahasia".into(),
            fiscal_year: fiscal_year.into(),
            region_code: "1234".into(),
        }
    }

    #[test]
    fn discriminant_is_the_digit_length() {
        assert_eq!(
            interpret_login_result(" 320101200100 "),
            LoginOutcome::Village(VillageCode::from_str("320101200100").unwrap())
        );
        assert_eq!(
            interpret_login_result("32.01.01.2001.00"),
            LoginOutcome::Village(VillageCode::from_str("320101200100").unwrap())
        );
        assert_eq!(
            interpret_login_result("32010120010"),
            LoginOutcome::Rejected("32010120010".into())
        );
        assert_eq!(
            interpret_login_result("Password salah untuk user 320101200100"),
            LoginOutcome::Rejected("Password salah untuk user 320101200100".into())
        );
        assert_eq!(interpret_login_result("   "), LoginOutcome::Empty);
    }

    #[tokio::test]
    async fn twelve_digit_result_signs_in() {
        let stub = StubProcedures::with_login_result("320101200100");
        let validator = MobileCredentialValidator::new(Arc::new(stub.clone()), keys(), Duration::from_secs(5));

        let identity = validator.authenticate(request("2025")).await.unwrap();
        assert_eq!(identity.village_code.as_str(), "320101200100");
        assert_eq!(identity.village_name, "");
        assert_eq!(identity.fiscal_year, 2025);
        assert_eq!(identity.region_code.as_str(), "1234");
        assert_eq!(stub.calls(), vec!["sp_login_usersiskeudes(2025, bendahara)".to_string()]);
    }

    #[tokio::test]
    async fn rejection_message_is_surfaced_verbatim() {
        let stub = StubProcedures::with_login_result("Username tidak terdaftar!");
        let validator = MobileCredentialValidator::new(Arc::new(stub), keys(), Duration::from_secs(5));

        let err = validator.authenticate(request("2025")).await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("Username tidak terdaftar!".into()));
        assert_eq!(
            ApiError::from(err),
            ApiError::LoginFailed("Username tidak terdaftar!".into())
        );
    }

    #[tokio::test]
    async fn fiscal_year_is_checked_before_the_procedure_runs() {
        let stub = StubProcedures::with_login_result("320101200100");
        let validator = MobileCredentialValidator::new(Arc::new(stub.clone()), keys(), Duration::from_secs(5));

        let err = validator.authenticate(request("25")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput { ref field, .. } if field == "fiscal_year"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_or_slow_result_is_upstream_failure() {
        let stub = StubProcedures::new();
        let validator = MobileCredentialValidator::new(Arc::new(stub.clone()), keys(), Duration::from_secs(5));
        assert!(matches!(
            validator.authenticate(request("2025")).await,
            Err(AuthError::Upstream(_))
        ));

        let slow = StubProcedures::with_login_result("320101200100");
        slow.delay_by(Duration::from_millis(500));
        let validator = MobileCredentialValidator::new(Arc::new(slow), keys(), Duration::from_millis(20));
        assert!(matches!(
            validator.authenticate(request("2025")).await,
            Err(AuthError::Upstream(_))
        ));
    }
}
