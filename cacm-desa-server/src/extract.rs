//! Session extractors for the two namespaces.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cacm_desa_api::domain::{AdminIdentity, MobileIdentity, TenantScope};
use cacm_desa_api::error::ApiError;

use crate::error::AppError;
use crate::session::{AdminClaims, MobileClaims};
use crate::state::AppState;

/// A verified admin token.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminIdentity);

/// An admin session with its tenant scope resolved for this request.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub identity: AdminIdentity,
    pub scope: TenantScope,
}

/// A verified village token.
#[derive(Debug, Clone)]
pub struct MobileSession(pub MobileIdentity);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = state
            .admin_sessions
            .token_from_headers(&parts.headers)
            .ok_or(AppError(ApiError::Unauthorized))?;
        let claims: AdminClaims = state.admin_sessions.verify(&token).map_err(|err| {
            tracing::debug!(%err, "admin token rejected");
            AppError(ApiError::Unauthorized)
        })?;
        Ok(Self(claims.payload))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AdminSession(identity) = AdminSession::from_request_parts(parts, state).await?;
        let scope = state.scopes.resolve(&identity).await?;
        Ok(Self { identity, scope })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MobileSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = state
            .mobile_sessions
            .token_from_headers(&parts.headers)
            .ok_or(AppError(ApiError::Unauthorized))?;
        let claims: MobileClaims = state.mobile_sessions.verify(&token).map_err(|err| {
            tracing::debug!(%err, "village token rejected");
            AppError(ApiError::Unauthorized)
        })?;
        Ok(Self(claims.payload.mobile))
    }
}
