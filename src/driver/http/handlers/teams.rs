//! Team Handlers
//!
//! `/api/teams` 配下と `/api/registration/me`

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::dto::commands::{
    CreateJoinRequestCommand, CreateTeamCommand, JoinRandomCommand, JoinTeamCommand,
    LeaveTeamCommand, RespondJoinRequestCommand,
};
use crate::application::use_cases::leave_team::LeaveOutcome;
use crate::application::use_cases::list_teams::TeamQuery;
use crate::domain::error::TeamError;
use crate::domain::services::slot_schedule::format_slot;
use crate::driver::http::error::ApiError;
use crate::driver::http::session::require_admin;
use crate::driver::http::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsParams {
    id: Option<String>,
    event: Option<String>,
    event_date: Option<NaiveDate>,
}

/// GET /api/teams
///
/// `id` 指定時は単一のチーム、それ以外は一覧を返す
pub async fn list_teams(
    State(state): State<AppState>,
    params: Result<Query<TeamsParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let single = params.id.is_some();
    let teams = state
        .list_teams()
        .execute(&TeamQuery {
            id: params.id,
            event: params.event,
            event_date: params.event_date,
        })
        .await?;

    if single {
        let team = teams.into_iter().next().ok_or(TeamError::TeamNotFound)?;
        return Ok(Json(json!(team)));
    }
    Ok(Json(json!(teams)))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    body: Result<Json<CreateTeamCommand>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let team = state.create_team().execute(&command).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Team created successfully.", "team": team })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsParams {
    event: Option<String>,
    event_date: Option<NaiveDate>,
}

/// GET /api/teams/slots
pub async fn available_slots(
    State(state): State<AppState>,
    params: Result<Query<SlotsParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let event_date = params
        .event_date
        .ok_or_else(|| TeamError::missing("Missing eventDate."))?;
    let slots: Vec<String> = state
        .list_teams()
        .available_slots(params.event.as_deref(), event_date)
        .await?
        .into_iter()
        .map(format_slot)
        .collect();
    Ok(Json(json!({ "eventDate": event_date, "slots": slots })))
}

/// POST /api/teams/join
pub async fn join_team(
    State(state): State<AppState>,
    body: Result<Json<JoinTeamCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let team = state.join_team().execute(&command).await?;
    Ok(Json(json!({ "message": "Joined team successfully.", "team": team })))
}

/// POST /api/teams/join-random
pub async fn join_random(
    State(state): State<AppState>,
    body: Result<Json<JoinRandomCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let outcome = state.join_random().execute(&command).await?;
    Ok(Json(json!({
        "message": "Added to the random pool. You will be placed in a team soon.",
        "entry": outcome.entry,
        "queuePosition": outcome.queue_position,
    })))
}

/// POST /api/teams/leave
pub async fn leave_team(
    State(state): State<AppState>,
    body: Result<Json<LeaveTeamCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let outcome = state.leave_team().execute(&command).await?;
    let message = match &outcome {
        LeaveOutcome::Left { .. } => "Left team successfully.",
        LeaveOutcome::Disbanded { .. } => "Team disbanded.",
    };
    Ok(Json(json!({ "message": message, "result": outcome })))
}

#[derive(Debug, Deserialize)]
pub struct ScoreBody {
    score: Option<i64>,
}

/// PATCH /api/teams/:id/score（管理者のみ）
pub async fn update_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<String>,
    body: Result<Json<ScoreBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers).await?;
    let Json(body) = body?;
    let score = body
        .score
        .ok_or_else(|| TeamError::missing("Missing score."))?;

    let _gate = state.write_gate().await;
    let team = state.update_score().execute(&team_id, score).await?;
    Ok(Json(json!({ "message": "Score updated.", "team": team })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderParams {
    leader_id: Option<String>,
}

/// GET /api/teams/join-requests
pub async fn list_join_requests(
    State(state): State<AppState>,
    params: Result<Query<LeaderParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let leader_id = params
        .leader_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| TeamError::missing("Missing leaderId."))?;
    let requests = state.join_requests().list_for_leader(&leader_id).await?;
    Ok(Json(json!(requests)))
}

/// POST /api/teams/join-requests
pub async fn respond_join_request(
    State(state): State<AppState>,
    body: Result<Json<RespondJoinRequestCommand>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let request = state.join_requests().respond(&command).await?;
    Ok(Json(json!({ "message": "Request updated.", "request": request })))
}

/// POST /api/teams/join-requests/create
pub async fn create_join_request(
    State(state): State<AppState>,
    body: Result<Json<CreateJoinRequestCommand>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(command) = body?;
    let _gate = state.write_gate().await;
    let request = state.join_requests().create(&command).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Join request sent.", "request": request })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationParams {
    user_email: Option<String>,
    event: Option<String>,
}

/// GET /api/registration/me
pub async fn registration_me(
    State(state): State<AppState>,
    params: Result<Query<RegistrationParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let email = params
        .user_email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| TeamError::missing("Missing userEmail."))?;
    let event_date = state
        .participant()
        .registration_date(&email, params.event.as_deref())
        .await?;
    Ok(Json(json!({ "event_date": event_date })))
}
