use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(allowed: &[String]) -> Self {
        Self {
            allowed: allowed
                .iter()
                .map(|origin| origin.trim_end_matches('/').to_string())
                .collect(),
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == origin)
    }

    /// The offending origin, if the request carries one that is not allowed.
    /// Requests without an `Origin` header pass.
    pub fn rejected_origin(&self, request: &Request) -> Option<String> {
        let origin = request.headers().get(ORIGIN)?;
        match origin.to_str() {
            Ok(origin) if self.is_allowed(origin) => None,
            Ok(origin) => Some(origin.to_string()),
            Err(_) => Some(String::from_utf8_lossy(origin.as_bytes()).into_owned()),
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, "Ignoring unusable allowed origin: {}", e);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true)
    }
}

pub async fn enforce_origin(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    match policy.rejected_origin(&request) {
        Some(origin) => ApiError::OriginNotAllowed(origin).into_response(),
        None => next.run(request).await,
    }
}
