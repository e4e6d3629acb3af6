use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use spdrive_graph::AuthMode;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Token strategy selected at startup.
    pub auth_mode: AuthMode,
}

/// GET /health -- liveness only; Graph and the token endpoint are not probed.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.drive.authenticator().mode(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
