use axum::Json;
use axum::extract::State;

use crate::state::AppState;

pub const INDEX_MESSAGE: &str = "Clan war summary server is running.";

pub async fn index() -> &'static str {
    INDEX_MESSAGE
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "clans": state.clans.len(),
        "observability": {
            "warsummary_requests_total": observability.warsummary_requests_total,
            "clan_errors_total": observability.clan_errors_total,
        }
    }))
}
