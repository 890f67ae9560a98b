//! HTTP Driver
//!
//! axum のルーター定義とサーバー起動

pub mod error;
pub mod handlers;
pub mod session;
pub mod state;

use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use handlers::{admin, auth, teams};
pub use state::AppState;

/// すべてのAPIルートを持つルーターを作成
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route("/api/teams/slots", get(teams::available_slots))
        .route("/api/teams/join", post(teams::join_team))
        .route("/api/teams/join-random", post(teams::join_random))
        .route("/api/teams/leave", post(teams::leave_team))
        .route("/api/teams/:id/score", patch(teams::update_score))
        .route(
            "/api/teams/join-requests",
            get(teams::list_join_requests).post(teams::respond_join_request),
        )
        .route(
            "/api/teams/join-requests/create",
            post(teams::create_join_request),
        )
        .route("/api/registration/me", get(teams::registration_me))
        .route("/api/auth/onboarding", post(auth::onboarding))
        .route("/api/auth/participant-login", post(auth::participant_login))
        .route("/api/auth/admin-login", post(auth::admin_login))
        .route("/api/auth/admin-logout", post(auth::admin_logout))
        .route("/api/auth/admin-validate", get(auth::admin_validate))
        .route("/api/auth/admin/session", get(auth::admin_session))
        .route("/api/admin/setup-admin", get(admin::setup_admin))
        .route("/api/admin/check-db", get(admin::check_db))
        .route("/api/admin/merge-teams", post(admin::merge_teams))
        .route("/api/admin/assign-from-pool", post(admin::assign_from_pool))
        .route(
            "/api/admin/assign-leader",
            get(admin::leader_candidates).post(admin::assign_leader),
        )
        .route("/api/admin/random-pool", get(admin::random_pool))
        .route(
            "/api/admin/generate-random-teams",
            get(admin::unassigned_users).post(admin::generate_random_teams),
        )
        .layer(cors)
        .with_state(state)
}

/// 指定アドレスでサーバーを起動し、終了シグナルまで待機する
///
/// # Errors
///
/// アドレスのバインドに失敗した場合
pub async fn serve(state: AppState, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server running on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
