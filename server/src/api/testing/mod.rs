pub mod ping;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for liveness endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ping::health))
        .route("/test", get(ping::ping))
}

#[derive(OpenApi)]
#[openapi(paths(ping::health, ping::ping), components(schemas(ping::PingResponse)))]
pub struct ApiDoc;
