//! Admin handlers: session, period documentation, dispatch and triggers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use cacm_desa_api::domain::AdminIdentity;
use cacm_desa_api::requests::{
    AdminLoginRequest, CreateFlagDetailRequest, CreatePeriodRequest, DispatchRequest, DocumentRequest,
    IdentifyRequest, PeriodListQuery, SwitchFiscalYearRequest, UpdateDetailStatusRequest, UpdatePeriodRequest,
};
use cacm_desa_api::service::CredentialValidator;
use cacm_desa_core::period::{FindingDetailView, FindingView};
use cacm_desa_core::{CounterDrift, DispatchSummary};
use cacm_desa_db::models::{AtensiPeriodModel, FlagDetailModel, IdentificationLogModel, PeriodFlagType};
use cacm_desa_db::repository::Page;
use uuid::Uuid;

use super::{with_cookie, Ack, SessionResponse};
use crate::error::HandlerResult;
use crate::extract::{AdminContext, AdminSession};
use crate::state::AppState;

fn signed_in(state: &AppState, identity: AdminIdentity) -> HandlerResult<Response> {
    let token = state.admin_sessions.issue(&identity)?;
    let cookie = state.admin_sessions.session_cookie(&token)?;
    let body = SessionResponse {
        identity,
        token,
        expires_in: state.admin_sessions.lifetime().as_secs(),
    };
    Ok(with_cookie(cookie, Json(body)))
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(request): Json<AdminLoginRequest>) -> HandlerResult<Response> {
    let identity = state.admin_auth.authenticate(request).await?;
    signed_in(&state, identity)
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> HandlerResult<Response> {
    let cookie = state.admin_sessions.clearing_cookie()?;
    Ok(with_cookie(cookie, StatusCode::NO_CONTENT))
}

/// GET /api/auth/session
pub async fn session(AdminSession(identity): AdminSession) -> Json<AdminIdentity> {
    Json(identity)
}

/// PATCH /api/auth/session
pub async fn switch_fiscal_year(
    State(state): State<AppState>,
    AdminSession(identity): AdminSession,
    Json(request): Json<SwitchFiscalYearRequest>,
) -> HandlerResult<Response> {
    let identity = state.admin_auth.switch_fiscal_year(&identity, request).await?;
    signed_in(&state, identity)
}

/// GET /api/dokumentasi
pub async fn list_periods(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(query): Query<PeriodListQuery>,
) -> HandlerResult<Json<Page<AtensiPeriodModel>>> {
    Ok(Json(state.periods.list(&ctx.scope, query).await?))
}

/// POST /api/dokumentasi
pub async fn create_period(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(request): Json<CreatePeriodRequest>,
) -> HandlerResult<(StatusCode, Json<AtensiPeriodModel>)> {
    let period = state
        .periods
        .create(&ctx.scope, &ctx.identity.username, request)
        .await?;
    Ok((StatusCode::CREATED, Json(period)))
}

/// GET /api/dokumentasi/:id
pub async fn get_period(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
) -> HandlerResult<Json<AtensiPeriodModel>> {
    Ok(Json(state.periods.get(&ctx.scope, id).await?))
}

/// PUT /api/dokumentasi/:id
pub async fn update_period(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePeriodRequest>,
) -> HandlerResult<Json<AtensiPeriodModel>> {
    let period = state
        .periods
        .update(&ctx.scope, &ctx.identity.username, id, request)
        .await?;
    Ok(Json(period))
}

/// DELETE /api/dokumentasi/:id
pub async fn delete_period(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
) -> HandlerResult<StatusCode> {
    state.periods.delete(&ctx.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dokumentasi/:id/jenis-atensi
pub async fn period_flag_types(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
) -> HandlerResult<Json<Vec<PeriodFlagType>>> {
    Ok(Json(state.periods.flag_types(&ctx.scope, id).await?))
}

/// GET /api/dokumentasi/:id/desa
pub async fn period_findings(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
) -> HandlerResult<Json<Vec<FindingView>>> {
    Ok(Json(state.periods.findings(&ctx.scope, id).await?))
}

/// GET /api/dokumentasi/:id/desa/:desa (finding id)
pub async fn finding_detail(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path((id, finding_id)): Path<(Uuid, Uuid)>,
) -> HandlerResult<Json<FindingDetailView>> {
    Ok(Json(state.periods.finding_detail(&ctx.scope, id, finding_id).await?))
}

/// POST /api/dokumentasi/:id/desa/:desa/rinc (village code)
pub async fn create_detail(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path((id, village_code)): Path<(Uuid, String)>,
    Json(request): Json<CreateFlagDetailRequest>,
) -> HandlerResult<(StatusCode, Json<FlagDetailModel>)> {
    let detail = state
        .documentation
        .create_detail(&ctx.scope, &ctx.identity.username, id, &village_code, request)
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/rinc/:detail_id/status
pub async fn update_detail_status(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(detail_id): Path<Uuid>,
    Json(request): Json<UpdateDetailStatusRequest>,
) -> HandlerResult<Json<FlagDetailModel>> {
    let detail = state
        .documentation
        .update_detail_status(&ctx.scope, &ctx.identity.username, detail_id, request)
        .await?;
    Ok(Json(detail))
}

/// POST /api/dokumentasi/:id/kirim
pub async fn dispatch(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
    Json(request): Json<DispatchRequest>,
) -> HandlerResult<Json<DispatchSummary>> {
    let summary = state
        .dispatch
        .dispatch(&ctx.scope, &ctx.identity.username, id, request)
        .await?;
    Ok(Json(summary))
}

/// GET /api/dokumentasi/:id/drift
pub async fn counter_drift(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<Uuid>,
) -> HandlerResult<Json<Vec<CounterDrift>>> {
    Ok(Json(state.aggregator.counter_drift(&ctx.scope, id).await?))
}

/// POST /api/identifikasi/cek
pub async fn identify(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(request): Json<IdentifyRequest>,
) -> HandlerResult<Json<Ack>> {
    state.identification.identify(request).await?;
    Ok(Ack::ok())
}

/// POST /api/identifikasi/arsipkan
pub async fn archive(State(state): State<AppState>, _session: AdminSession) -> HandlerResult<Json<Ack>> {
    state.identification.archive().await?;
    Ok(Ack::ok())
}

/// POST /api/identifikasi/dokumentasi
pub async fn document(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(request): Json<DocumentRequest>,
) -> HandlerResult<(StatusCode, Json<AtensiPeriodModel>)> {
    let period = state
        .identification
        .document(&ctx.scope, &ctx.identity.username, request)
        .await?;
    Ok((StatusCode::CREATED, Json(period)))
}

/// GET /api/identifikasi
pub async fn latest_identification(
    State(state): State<AppState>,
    ctx: AdminContext,
) -> HandlerResult<Json<Option<IdentificationLogModel>>> {
    Ok(Json(state.identification.latest_identification(&ctx.scope).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::session::{AdminClaims, ADMIN_COOKIE};
    use crate::state::test_support::{admin_context, seed_admin, test_state};
    use axum::http::header;
    use cacm_desa_api::error::ApiError;
    use cacm_desa_core::test_helper::{date, InMemoryUnitOfWork, StubProcedures};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_request(period_number: &str) -> CreatePeriodRequest {
        CreatePeriodRequest {
            period_number: period_number.into(),
            raised_date: Some(date(2025, 1, 10)),
            cutoff_date: Some(date(2025, 1, 5)),
            note: None,
        }
    }

    #[tokio::test]
    async fn login_sets_the_admin_cookie() {
        let uow = InMemoryUnitOfWork::new();
        seed_admin(&uow, "operator", "rahasia", "1234");
        let state = test_state(&uow, &StubProcedures::new());

        let response = login(
            State(state.clone()),
            Json(AdminLoginRequest {
                username: "operator".into(),
                password: "rahasia".into(),
                fiscal_year: Some(2025),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with(&format!("{ADMIN_COOKIE}=")));
        assert!(cookie.contains("Path=/api"));

        let body = body_json(response).await;
        assert_eq!(body["identity"]["username"], "operator");
        assert_eq!(body["expiresIn"], 8 * 3600);
        let token = body["token"].as_str().unwrap();
        let claims: AdminClaims = state.admin_sessions.verify(token).unwrap();
        assert_eq!(claims.payload.fiscal_year, Some(2025));
    }

    #[tokio::test]
    async fn failed_login_is_generic() {
        let uow = InMemoryUnitOfWork::new();
        seed_admin(&uow, "operator", "rahasia", "1234");
        let state = test_state(&uow, &StubProcedures::new());

        for (username, password) in [("operator", "salah"), ("siapa", "rahasia")] {
            let err = login(
                State(state.clone()),
                Json(AdminLoginRequest {
                    username: username.into(),
                    password: password.into(),
                    fiscal_year: Some(2025),
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(err, AppError(ApiError::LoginFailed("login failed".into())));
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn fiscal_year_switch_reissues_the_token() {
        let uow = InMemoryUnitOfWork::new();
        seed_admin(&uow, "operator", "rahasia", "1234");
        let state = test_state(&uow, &StubProcedures::new());
        let identity = state
            .admin_auth
            .authenticate(AdminLoginRequest {
                username: "operator".into(),
                password: "rahasia".into(),
                fiscal_year: Some(2025),
            })
            .await
            .unwrap();

        let response = switch_fiscal_year(
            State(state.clone()),
            AdminSession(identity.clone()),
            Json(SwitchFiscalYearRequest { fiscal_year: 2024 }),
        )
        .await
        .unwrap();

        let body = body_json(response).await;
        let claims: AdminClaims = state.admin_sessions.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.payload.fiscal_year, Some(2024));
        assert_eq!(claims.payload.session_id, identity.session_id);
        assert_eq!(uow.snapshot().admin_sessions[&identity.session_id].fiscal_year, Some(2024));
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        let state = test_state(&InMemoryUnitOfWork::new(), &StubProcedures::new());
        let response = logout(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn second_dispatch_is_a_conflict() {
        let uow = InMemoryUnitOfWork::new();
        let stub = StubProcedures::new();
        let state = test_state(&uow, &stub);
        let ctx = admin_context(&uow, 2025, "1234");

        let (status, Json(period)) = create_period(State(state.clone()), ctx.clone(), Json(create_request("001")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        stub.archive_into(&uow, period.id, vec![("123401200100", vec![(10, "B-10"), (20, "B-20")])]);
        archive(State(state.clone()), AdminSession(ctx.identity.clone()))
            .await
            .unwrap();

        let request = || {
            Json(DispatchRequest {
                selected_flag_type_codes: vec![10],
            })
        };
        let Json(summary) = dispatch(State(state.clone()), ctx.clone(), Path(period.id), request())
            .await
            .unwrap();
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.not_selected, 1);

        let err = dispatch(State(state), ctx, Path(period.id), request()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn foreign_period_is_forbidden() {
        let uow = InMemoryUnitOfWork::new();
        let state = test_state(&uow, &StubProcedures::new());
        let mine = admin_context(&uow, 2025, "1234");
        let theirs = admin_context(&uow, 2025, "5678");

        let (_, Json(period)) = create_period(State(state.clone()), theirs, Json(create_request("001")))
            .await
            .unwrap();

        let err = get_period(State(state.clone()), mine.clone(), Path(period.id))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = get_period(State(state), mine, Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn procedure_failure_is_a_bad_gateway() {
        let uow = InMemoryUnitOfWork::new();
        let stub = StubProcedures::new();
        stub.fail_with("connection reset by peer");
        let state = test_state(&uow, &stub);
        let ctx = admin_context(&uow, 2025, "1234");

        let err = identify(
            State(state),
            AdminSession(ctx.identity),
            Json(IdentifyRequest {
                as_of_date: date(2025, 1, 31),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.body().message.contains("connection reset"));
    }
}
