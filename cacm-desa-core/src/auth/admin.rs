use async_trait::async_trait;
use cacm_desa_api::domain::{AdminIdentity, PermissionSet};
use cacm_desa_api::error::{ApiError, ApiResult, AuthError};
use cacm_desa_api::requests::{AdminLoginRequest, SwitchFiscalYearRequest};
use cacm_desa_api::service::CredentialValidator;
use cacm_desa_db::models::AdminSessionModel;
use cacm_desa_db::repository::{CreateBatch, RepositoryError};
use cacm_desa_db::unit_of_work::{UnitOfWork, UnitOfWorkSession};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::invalid_input;
use super::password::verify_password;

fn upstream(err: RepositoryError) -> AuthError {
    AuthError::Upstream(err.to_string())
}

/// Admin sign-in against the user table.
///
/// A successful sign-in stamps `last_login` and writes a tracking row into
/// the session table; both happen in one transaction.
#[derive(Clone)]
pub struct AdminCredentialValidator {
    uow: Arc<dyn UnitOfWork>,
    session_lifetime: Duration,
}

impl AdminCredentialValidator {
    pub fn new(uow: Arc<dyn UnitOfWork>, session_lifetime: Duration) -> Self {
        Self {
            uow,
            session_lifetime,
        }
    }

    /// Record a fiscal year switch on the session row and return the
    /// identity to re-sign.
    #[tracing::instrument(skip_all, fields(user = %identity.username, fiscal_year = request.fiscal_year))]
    pub async fn switch_fiscal_year(
        &self,
        identity: &AdminIdentity,
        request: SwitchFiscalYearRequest,
    ) -> ApiResult<AdminIdentity> {
        request.validate()?;
        let session = self.uow.begin().await?;
        let updated = session
            .admin_sessions()
            .update_fiscal_year(identity.session_id, request.fiscal_year)
            .await?;
        if !updated {
            tracing::warn!(session_id = %identity.session_id, "no tracking row for admin session");
            return Err(ApiError::Unauthorized);
        }
        session.commit().await?;

        Ok(AdminIdentity {
            fiscal_year: Some(request.fiscal_year),
            ..identity.clone()
        })
    }
}

#[async_trait]
impl CredentialValidator for AdminCredentialValidator {
    type Credentials = AdminLoginRequest;
    type Identity = AdminIdentity;

    #[tracing::instrument(skip_all, fields(user = %credentials.username.trim()))]
    async fn authenticate(&self, credentials: AdminLoginRequest) -> Result<AdminIdentity, AuthError> {
        credentials.validate().map_err(invalid_input)?;
        let username = credentials.username.trim();

        let session = self.uow.begin().await.map_err(upstream)?;
        let user = match session.users().find_by_username(username).await.map_err(upstream)? {
            Some(user) if user.active => user,
            Some(_) => {
                tracing::warn!("sign-in rejected: user inactive");
                return Err(AuthError::UnknownOrInactive);
            }
            None => {
                tracing::warn!("sign-in rejected: unknown user");
                return Err(AuthError::UnknownOrInactive);
            }
        };

        match verify_password(&credentials.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("sign-in rejected: wrong password");
                return Err(AuthError::WrongPassword);
            }
            Err(detail) => {
                tracing::warn!(%detail, "sign-in rejected: stored hash unusable");
                return Err(AuthError::WrongPassword);
            }
        }

        let (permissions, malformed) = PermissionSet::from_json_or_empty(user.permissions_json.as_deref());
        if malformed {
            tracing::warn!(role = %user.role_code, "role permissions are not a JSON string array, granting none");
        }

        let now = Utc::now();
        let tracking = AdminSessionModel {
            id: Uuid::new_v4(),
            user_id: user.id,
            fiscal_year: credentials.fiscal_year,
            created_at: now,
            expires_at: now + self.session_lifetime,
        };
        session.users().touch_last_login(user.id, now).await.map_err(upstream)?;
        session
            .admin_sessions()
            .create_batch(vec![tracking.clone()])
            .await
            .map_err(upstream)?;
        session.commit().await.map_err(upstream)?;

        tracing::info!(session_id = %tracking.id, "admin signed in");
        Ok(AdminIdentity {
            user_id: user.id,
            username: user.username,
            name: user.name,
            role: user.role_name,
            role_code: user.role_code,
            permissions,
            tenant_id: user.tenant_id,
            tenant_name: user.tenant_name.unwrap_or_default(),
            fiscal_year: credentials.fiscal_year,
            session_id: tracking.id,
        })
    }
}
