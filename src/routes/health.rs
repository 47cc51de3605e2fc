use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::state::AppState;

/// Root path - service banner
///
/// # Returns
///
/// JSON with the service name and version
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "service": "quickdraw",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Health check endpoint
///
/// # Returns
///
/// JSON response with status
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// Live room and player counts
///
/// # Returns
///
/// JSON with the number of open rooms and connected players
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let (rooms, players) = state.rooms.stats().await;
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "rooms": rooms,
            "players": players,
        })),
    )
}
