use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use mise_core::{PipelineError, RecipeQuery};

/// Generate a recipe from the caller's constraints
///
/// Makes one call to the generation model and returns the result as a
/// sanitized HTML fragment. The response is sent in one piece once the model
/// has finished.
#[utoipa::path(
    get,
    path = "/recipestream",
    tag = "recipes",
    params(RecipeQuery),
    responses(
        (status = 200, description = "Rendered recipe markup", body = String, content_type = "text/html"),
        (status = 400, description = "Missing or malformed constraints", body = ErrorResponse),
        (status = 500, description = "Generation service returned an unusable response", body = ErrorResponse),
        (status = 503, description = "Generation service unavailable, retry later", body = ErrorResponse),
        (status = 504, description = "Generation service timed out, retry later", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(pipeline): State<AppState>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unparseable recipe query");
            return error_response(&PipelineError::BadRequest(rejection.body_text()));
        }
    };

    match pipeline.handle(query).await {
        Ok(rendered) => Html(rendered.into_html()).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &PipelineError) -> Response {
    let status = match err {
        PipelineError::BadRequest(_) => StatusCode::BAD_REQUEST,
        PipelineError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PipelineError::UpstreamContractViolation => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
    };

    let mut response = (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response();

    if let PipelineError::UpstreamUnavailable {
        retry_after_secs: Some(secs),
        ..
    } = err
    {
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }

    response
}
