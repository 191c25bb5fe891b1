use axum::{extract::rejection::JsonRejection, routing::post, Extension, Json, Router};
use ia_llm::SocialPost;
use serde::Serialize;

use super::content_request::ContentRequest;
use crate::app_module::AppState;
use crate::app_router::route_not_found;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct GeneratePostsResponse {
    pub success: bool,
    pub posts: Vec<SocialPost>,
}

pub fn content_router() -> Router {
    Router::new().route("/generate", post(generate_posts).fallback(route_not_found))
}

pub async fn generate_posts(
    Extension(ctx): Extension<AppState>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> ApiResult<Json<GeneratePostsResponse>> {
    let Json(request) = payload?;
    let brief = request.validate()?;

    tracing::info!(
        business_type = %brief.business_type,
        post_count = brief.post_count,
        "Generating social posts"
    );

    let posts = ctx
        .service
        .content_service
        .generate(&brief)
        .await
        .map_err(|source| ApiError::Generation {
            message: "Error al generar el contenido",
            source,
        })?;

    Ok(Json(GeneratePostsResponse {
        success: true,
        posts,
    }))
}
