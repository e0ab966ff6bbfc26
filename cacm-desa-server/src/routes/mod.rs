//! HTTP routes
//!
//! Admin endpoints live under `/api`, village endpoints under `/mobile/api`.
//! Each namespace reads only its own session cookie or bearer token.

pub mod admin;
pub mod mobile;

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Admin session
        .route("/api/auth/login", post(admin::login))
        .route("/api/auth/logout", post(admin::logout))
        .route("/api/auth/session", get(admin::session).patch(admin::switch_fiscal_year))
        // Periods
        .route("/api/dokumentasi", get(admin::list_periods).post(admin::create_period))
        .route(
            "/api/dokumentasi/:id",
            get(admin::get_period).put(admin::update_period).delete(admin::delete_period),
        )
        .route("/api/dokumentasi/:id/jenis-atensi", get(admin::period_flag_types))
        .route("/api/dokumentasi/:id/desa", get(admin::period_findings))
        .route("/api/dokumentasi/:id/desa/:desa", get(admin::finding_detail))
        .route("/api/dokumentasi/:id/desa/:desa/rinc", post(admin::create_detail))
        .route("/api/dokumentasi/:id/kirim", post(admin::dispatch))
        .route("/api/dokumentasi/:id/drift", get(admin::counter_drift))
        .route("/api/rinc/:detail_id/status", patch(admin::update_detail_status))
        // Identification
        .route("/api/identifikasi", get(admin::latest_identification))
        .route("/api/identifikasi/cek", post(admin::identify))
        .route("/api/identifikasi/arsipkan", post(admin::archive))
        .route("/api/identifikasi/dokumentasi", post(admin::document))
        // Village session
        .route("/mobile/api/auth/login", post(mobile::login))
        .route("/mobile/api/auth/logout", post(mobile::logout))
        .route("/mobile/api/auth/session", get(mobile::session))
        // Village portal
        .route("/mobile/api/atensidesa", get(mobile::dispatched_findings))
        .route("/mobile/api/atensidesa/:finding_id", get(mobile::finding_items))
        .route("/mobile/api/respon/:detail_id", get(mobile::response).post(mobile::respond))
        .route("/mobile/api/selesai", get(mobile::completed_items))
        .route("/mobile/api/refresh-tl", post(mobile::refresh_follow_up))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Sign-in answer; the same token is also set as the namespace cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse<T> {
    pub identity: T,
    pub token: String,
    pub expires_in: u64,
}

/// Body of the fire-and-forget trigger endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub(crate) fn with_cookie<T: IntoResponse>(cookie: HeaderValue, body: T) -> Response {
    ([(header::SET_COOKIE, cookie)], body).into_response()
}
