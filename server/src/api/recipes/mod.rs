pub mod generate;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for recipe generation endpoints
pub fn router() -> Router<AppState> {
    Router::new().route("/recipestream", get(generate::generate_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate::generate_recipe),
    components(schemas(mise_core::RecipeQuery))
)]
pub struct ApiDoc;
