use axum::{extract::rejection::JsonRejection, routing::post, Extension, Json, Router};
use serde::Serialize;

use super::property_request::PropertyRequest;
use crate::app_module::AppState;
use crate::app_router::route_not_found;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct GenerateDescriptionResponse {
    pub success: bool,
    pub description: String,
}

pub fn property_router() -> Router {
    Router::new().route(
        "/generate",
        post(generate_description).fallback(route_not_found),
    )
}

pub async fn generate_description(
    Extension(ctx): Extension<AppState>,
    payload: Result<Json<PropertyRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateDescriptionResponse>> {
    let Json(request) = payload?;
    let brief = request.validate()?;

    tracing::info!(
        property_type = %brief.property_type,
        location = %brief.location,
        "Generating property description"
    );

    let description = ctx
        .service
        .property_service
        .generate(&brief)
        .await
        .map_err(|source| ApiError::Generation {
            message: "Error al generar la descripción",
            source,
        })?;

    Ok(Json(GenerateDescriptionResponse {
        success: true,
        description,
    }))
}
