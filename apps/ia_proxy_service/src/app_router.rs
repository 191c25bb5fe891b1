use std::any::Any;

use axum::{
    error_handling::HandleErrorLayer,
    extract::OriginalUri,
    http::Method,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    app_module::AppState,
    content::content_controller::content_router,
    error::ApiError,
    health::health_controller::health,
    property::property_controller::property_router,
    shared::{origin_policy::enforce_origin, rate_limiter::limit_requests},
};

pub fn application_router(state: AppState) -> Router {
    let cors = state.origin_policy.cors_layer();

    Router::new()
        .route("/api/health", get(health).fallback(route_not_found))
        .nest("/api/propiedadia", property_router())
        .nest("/api/contenidoia", content_router())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.origin_policy.clone(),
                    enforce_origin,
                ))
                .layer(cors)
                .layer(middleware::from_fn_with_state(
                    state.rate_limiter.clone(),
                    limit_requests,
                ))
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(state.config.request_timeout)
                .layer(Extension(state))
                .into_inner(),
        )
}

pub async fn route_not_found(OriginalUri(uri): OriginalUri, method: Method) -> ApiError {
    ApiError::NotFound {
        path: uri.path().to_string(),
        method: method.to_string(),
    }
}

async fn handle_middleware_error(error: BoxError) -> ApiError {
    if error.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Unhandled internal error: {}", error))
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(details).into_response()
}
