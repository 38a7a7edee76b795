//! Liveness and readiness probes.

use axum::extract::State;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Pings the visitor profile store. Returns 503 Service Unavailable if it is
/// not reachable. The listing itself still degrades to anonymous visitors in
/// that case.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str> {
    state
        .profiles()
        .ping()
        .await
        .map_err(|e| AppError::Unavailable(format!("profile store: {e}")))?;
    Ok("ok")
}
