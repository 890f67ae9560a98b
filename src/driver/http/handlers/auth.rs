//! Auth Handlers
//!
//! 参加者のプロフィール登録・ログインと管理者セッション

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::application::dto::commands::{
    AdminLoginCommand, OnboardingCommand, ParticipantLoginCommand,
};
use crate::driver::http::error::ApiError;
use crate::driver::http::session::{clear_session, require_admin, set_session};
use crate::driver::http::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// POST /api/auth/onboarding
pub async fn onboarding(
    State(state): State<AppState>,
    body: Result<Json<OnboardingCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let outcome = state.participant().onboard(&command).await?;
    Ok(Json(json!({
        "message": "Profile completed successfully.",
        "user": outcome.user,
        "queued": outcome.queued,
    })))
}

/// POST /api/auth/participant-login
pub async fn participant_login(
    State(state): State<AppState>,
    body: Result<Json<ParticipantLoginCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let user = state.participant().login(&command).await?;
    Ok(Json(json!({
        "message": format!("Welcome back, {}!", user.name),
        "user": user,
    })))
}

/// POST /api/auth/admin-login
///
/// 成功時は `admin-session` クッキーを発行する
pub async fn admin_login(
    State(state): State<AppState>,
    body: Result<Json<AdminLoginCommand>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(command) = body?;
    let session = state.admin_auth().login(&command).await?;
    let headers = set_session(&session)?;
    Ok((
        headers,
        Json(json!({ "message": "Admin login successful.", "admin": session })),
    )
        .into_response())
}

/// POST /api/auth/admin-logout
pub async fn admin_logout() -> ApiResult<Response> {
    let headers = clear_session()?;
    Ok((headers, Json(json!({ "message": "Logged out." }))).into_response())
}

/// GET /api/auth/admin-validate
pub async fn admin_validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let session = require_admin(&state, &headers).await?;
    Ok(Json(json!({ "valid": true, "admin": session })))
}

/// GET /api/auth/admin/session
pub async fn admin_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let session = require_admin(&state, &headers).await?;
    Ok(Json(json!({ "authenticated": true, "admin": session })))
}
