//! Admin Handlers
//!
//! `/api/admin` 配下。`setup-admin` と `check-db` 以外は管理者セッションが必要

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::dto::commands::{
    AssignFromPoolCommand, AssignLeaderCommand, GenerateTeamsCommand, MergeTeamsCommand,
};
use crate::application::use_cases::admin_auth::SetupOutcome;
use crate::domain::error::TeamError;
use crate::driver::http::error::ApiError;
use crate::driver::http::session::require_admin;
use crate::driver::http::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// GET /api/admin/setup-admin
///
/// 管理者が1人もいない場合のみ設定ファイルの初期管理者を作成する
pub async fn setup_admin(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let _gate = state.write_gate().await;
    let admin = state.default_admin().clone();
    let outcome = state
        .admin_auth()
        .setup_default(&admin.username, &admin.password)
        .await?;

    let message = match &outcome {
        SetupOutcome::Created { .. } => "Default admin created.",
        SetupOutcome::Exists { .. } => "Admin already exists.",
    };
    Ok(Json(json!({ "message": message, "result": outcome })))
}

/// GET /api/admin/check-db
pub async fn check_db(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let health = state.check_db().execute().await?;
    Ok(Json(json!({ "message": "Data store reachable.", "counts": health })))
}

/// POST /api/admin/merge-teams
pub async fn merge_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MergeTeamsCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let outcome = state.merge_teams().execute(&command).await?;
    Ok(Json(json!({
        "message": "Teams merged successfully.",
        "targetTeamId": outcome.target_team_id,
        "mergedCount": outcome.merged_count,
    })))
}

/// POST /api/admin/assign-from-pool
pub async fn assign_from_pool(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssignFromPoolCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let assignment = state.assign_from_pool().execute(&command).await?;
    Ok(Json(json!({
        "message": format!("{} assigned to {}.", assignment.user.name, assignment.team.name),
        "team": assignment.team,
        "user": assignment.user,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamIdParams {
    team_id: Option<String>,
}

/// GET /api/admin/assign-leader
pub async fn leader_candidates(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<TeamIdParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Query(params) = params?;
    let team_id = params
        .team_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| TeamError::missing("Missing teamId."))?;
    let view = state.assign_leader().team_members(&team_id).await?;
    Ok(Json(json!(view)))
}

/// POST /api/admin/assign-leader
pub async fn assign_leader(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssignLeaderCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let change = state.assign_leader().assign(&command).await?;
    Ok(Json(json!({ "message": "Leader updated.", "change": change })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolParams {
    event: Option<String>,
    #[serde(default)]
    dry_run: bool,
}

/// GET /api/admin/random-pool
pub async fn random_pool(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<PoolParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Query(params) = params?;
    let stats = state.random_pool().stats(params.event.as_deref()).await?;
    Ok(Json(json!(stats)))
}

/// GET /api/admin/generate-random-teams
///
/// 登録済みでチーム未所属の参加者一覧
pub async fn unassigned_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<PoolParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Query(params) = params?;
    let users = state
        .random_pool()
        .unassigned_users(params.event.as_deref())
        .await?;
    Ok(Json(json!({ "count": users.len(), "users": users })))
}

/// POST /api/admin/generate-random-teams
///
/// ボディが読めない場合は既定の人数とイベントで実行する。
/// `?dryRun=true` で計画のみ返す
pub async fn generate_random_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<PoolParams>, QueryRejection>,
    body: Option<Json<GenerateTeamsCommand>>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Query(params) = params?;
    let mut command = body.map(|Json(c)| c).unwrap_or_default();
    if command.event.is_none() {
        command.event = params.event;
    }

    let _gate = state.write_gate().await;
    let outcome = state
        .random_pool()
        .generate(&command, params.dry_run)
        .await?;
    let message = if outcome.dry_run {
        format!("Planned placement of {} participants.", outcome.placed)
    } else {
        format!("Placed {} participants.", outcome.placed)
    };
    Ok(Json(json!({ "message": message, "result": outcome })))
}
