use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::api::index))
        .route("/api/health", get(routes::api::health))
        .route("/warsummary", get(routes::warsummary::warsummary_page))
        .route("/api/warsummary", get(routes::warsummary::warsummary_json))
        .layer(CompressionLayer::new())
        .with_state(state)
}
