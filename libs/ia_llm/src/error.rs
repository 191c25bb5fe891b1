use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Transport error calling {model}: {message}")]
    Transport { model: String, message: String },

    #[error("Model {model} timed out after {}ms", .timeout.as_millis())]
    Timeout { model: String, timeout: Duration },

    #[error("Model {model} returned status {status}: {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Model {model} returned an empty response")]
    EmptyResponse { model: String },

    #[error("Could not parse model output: {reason}")]
    Parse { reason: String, raw_preview: String },

    #[error("All candidate models failed: {0}")]
    Exhausted(Box<LlmError>),

    #[error("No candidate models available")]
    NoCandidates,
}

impl LlmError {
    pub fn last_failure(&self) -> &LlmError {
        match self {
            LlmError::Exhausted(inner) => inner.last_failure(),
            other => other,
        }
    }

    pub fn raw_preview(&self) -> Option<&str> {
        match self.last_failure() {
            LlmError::Parse { raw_preview, .. } => Some(raw_preview.as_str()),
            _ => None,
        }
    }

    pub fn details(&self) -> String {
        self.last_failure().to_string()
    }
}
