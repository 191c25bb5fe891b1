use std::str::FromStr;
use std::time::Duration;

use ia_llm::ModelCandidate;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_BASE_URL: &str = ia_llm::openrouter::DEFAULT_BASE_URL;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(150);
const REQUEST_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

pub const DEFAULT_PROPERTY_MODELS: &[&str] = &[
    "meta-llama/llama-3.3-70b-instruct:free",
    "google/gemini-2.0-flash-exp:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
    "qwen/qwen-2.5-72b-instruct:free",
];

pub const DEFAULT_CONTENT_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-exp:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "deepseek/deepseek-chat-v3-0324:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error(
        "REQUEST_TIMEOUT_SECS ({}s) is shorter than a full model fallback run ({}s)",
        .configured.as_secs(),
        .required.as_secs()
    )]
    RequestTimeoutTooShort {
        configured: Duration,
        required: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            max_requests: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
    pub property_models: Vec<ModelCandidate>,
    pub content_models: Vec<ModelCandidate>,
    pub app_url: String,
    pub app_title: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = var("OPENROUTER_API_KEY").ok_or(ConfigError::Missing("OPENROUTER_API_KEY"))?;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        let window_ms = parse_number("RATE_LIMIT_WINDOW_MS", var("RATE_LIMIT_WINDOW_MS"), 60_000u64)?;
        if window_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW_MS",
                value: window_ms.to_string(),
            });
        }
        let rate_limit = RateLimitConfig {
            window: Duration::from_millis(window_ms),
            max_requests: parse_number("RATE_LIMIT_MAX", var("RATE_LIMIT_MAX"), 10u32)?,
        };

        let upstream_timeout = Duration::from_millis(parse_number(
            "UPSTREAM_TIMEOUT_MS",
            var("UPSTREAM_TIMEOUT_MS"),
            30_000u64,
        )?);
        let property_models = model_list(var("PROPERTY_MODELS"), DEFAULT_PROPERTY_MODELS);
        let content_models = model_list(var("CONTENT_MODELS"), DEFAULT_CONTENT_MODELS);

        // The whole-request timeout must outlast every candidate timing out in turn.
        let longest_run = property_models.len().max(content_models.len()) as u32;
        let required = upstream_timeout * longest_run + REQUEST_TIMEOUT_HEADROOM;
        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT.max(required),
            raw => {
                let configured =
                    Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", raw, 0u64)?);
                if configured < required {
                    return Err(ConfigError::RequestTimeoutTooShort {
                        configured,
                        required,
                    });
                }
                configured
            }
        };

        Ok(Self {
            api_key,
            port: parse_number("PORT", var("PORT"), DEFAULT_PORT)?,
            allowed_origins,
            upstream_base_url: var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            upstream_timeout,
            request_timeout,
            rate_limit,
            property_models,
            content_models,
            app_url: var("APP_URL").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            app_title: var("APP_TITLE").unwrap_or_else(|| "IA Proxy".to_string()),
        })
    }
}

fn parse_number<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn model_list(raw: Option<String>, defaults: &[&str]) -> Vec<ModelCandidate> {
    let ids = raw.map(|raw| split_list(&raw)).unwrap_or_default();
    if ids.is_empty() {
        defaults.iter().copied().map(ModelCandidate::from).collect()
    } else {
        ids.into_iter().map(ModelCandidate::new).collect()
    }
}
