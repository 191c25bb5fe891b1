use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ia_llm::LlmError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Generation {
        message: &'static str,
        source: LlmError,
    },

    #[error("Origen no permitido por CORS")]
    OriginNotAllowed(String),

    #[error("Ruta no encontrada")]
    NotFound { path: String, method: String },

    #[error("La solicitud tardó demasiado")]
    Timeout,

    #[error("Error interno del servidor")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Generation { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!(
            "Cuerpo de la solicitud inválido: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();

        let body = match self {
            ApiError::Validation(_) => json!({ "error": error }),
            ApiError::Generation { source, .. } => {
                tracing::error!("Generation failed: {}", source);
                let mut body = json!({
                    "error": error,
                    "details": source.details(),
                });
                if let Some(preview) = source.raw_preview() {
                    body["raw_response"] = json!(preview);
                }
                body
            }
            ApiError::OriginNotAllowed(origin) => {
                tracing::warn!(origin = %origin, "Rejected request from disallowed origin");
                json!({
                    "error": error,
                    "details": format!("El origen {} no está en la lista permitida", origin),
                })
            }
            ApiError::NotFound { path, method } => json!({
                "error": error,
                "path": path,
                "method": method,
            }),
            ApiError::Timeout => json!({
                "error": error,
                "details": "Se superó el tiempo máximo de procesamiento",
            }),
            ApiError::Internal(details) => {
                tracing::error!("Unhandled internal error: {}", details);
                json!({ "error": error, "details": details })
            }
        };

        (status, Json(body)).into_response()
    }
}
