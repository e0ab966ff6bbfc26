//! Village handlers, reachable with a mobile session only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use cacm_desa_api::domain::MobileIdentity;
use cacm_desa_api::requests::{MobileLoginRequest, RespondRequest};
use cacm_desa_api::service::CredentialValidator;
use cacm_desa_core::village::FindingItems;
use cacm_desa_db::models::{FlagDetailModel, RemediationView, VillageFindingModel};
use uuid::Uuid;

use super::{with_cookie, Ack, SessionResponse};
use crate::error::HandlerResult;
use crate::extract::MobileSession;
use crate::session::MobilePayload;
use crate::state::AppState;

/// POST /mobile/api/auth/login
pub async fn login(State(state): State<AppState>, Json(request): Json<MobileLoginRequest>) -> HandlerResult<Response> {
    let identity = state.mobile_auth.authenticate(request).await?;
    let token = state.mobile_sessions.issue(MobilePayload {
        mobile: identity.clone(),
    })?;
    let cookie = state.mobile_sessions.session_cookie(&token)?;
    let body = SessionResponse {
        identity,
        token,
        expires_in: state.mobile_sessions.lifetime().as_secs(),
    };
    Ok(with_cookie(cookie, Json(body)))
}

/// POST /mobile/api/auth/logout
pub async fn logout(State(state): State<AppState>) -> HandlerResult<Response> {
    let cookie = state.mobile_sessions.clearing_cookie()?;
    Ok(with_cookie(cookie, StatusCode::NO_CONTENT))
}

/// GET /mobile/api/auth/session
pub async fn session(MobileSession(identity): MobileSession) -> Json<MobileIdentity> {
    Json(identity)
}

/// GET /mobile/api/atensidesa
pub async fn dispatched_findings(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
) -> HandlerResult<Json<Vec<VillageFindingModel>>> {
    Ok(Json(state.village.dispatched_findings(&identity).await?))
}

/// GET /mobile/api/atensidesa/:finding_id
pub async fn finding_items(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
    Path(finding_id): Path<Uuid>,
) -> HandlerResult<Json<FindingItems>> {
    Ok(Json(state.village.finding_items(&identity, finding_id).await?))
}

/// GET /mobile/api/respon/:detail_id
pub async fn response(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
    Path(detail_id): Path<Uuid>,
) -> HandlerResult<Json<RemediationView>> {
    Ok(Json(state.village.response(&identity, detail_id).await?))
}

/// POST /mobile/api/respon/:detail_id
pub async fn respond(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
    Path(detail_id): Path<Uuid>,
    Json(request): Json<RespondRequest>,
) -> HandlerResult<Json<RemediationView>> {
    Ok(Json(state.village.respond(&identity, detail_id, request).await?))
}

/// GET /mobile/api/selesai
pub async fn completed_items(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
) -> HandlerResult<Json<Vec<FlagDetailModel>>> {
    Ok(Json(state.village.completed_items(&identity).await?))
}

/// POST /mobile/api/refresh-tl
pub async fn refresh_follow_up(
    State(state): State<AppState>,
    MobileSession(identity): MobileSession,
) -> HandlerResult<Json<Ack>> {
    state.village.refresh_follow_up(&identity).await?;
    Ok(Ack::ok())
}
