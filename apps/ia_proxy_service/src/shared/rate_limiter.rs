use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;

use crate::config::RateLimitConfig;

pub const RATE_LIMIT_MESSAGE: &str = "Demasiadas solicitudes. Intenta de nuevo en un minuto.";

const RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");
const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub hits: u32,
    pub resets_in: Duration,
}

/// Per-client counters behind the limiter.
///
/// `increment` must be atomic per key: two concurrent calls for the same key
/// always observe distinct hit counts.
pub trait RateLimitStore: Send + Sync {
    fn increment(&self, key: &str, window: Duration, now: Instant) -> WindowCount;

    fn sweep(&self, window: Duration, now: Instant);
}

#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    started: Instant,
    hits: u32,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    windows: Mutex<HashMap<String, FixedWindow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for InMemoryStore {
    fn increment(&self, key: &str, window: Duration, now: Instant) -> WindowCount {
        let mut windows = self.windows.lock();
        let entry = windows.entry(key.to_string()).or_insert(FixedWindow {
            started: now,
            hits: 0,
        });

        if now.saturating_duration_since(entry.started) >= window {
            entry.started = now;
            entry.hits = 0;
        }
        entry.hits = entry.hits.saturating_add(1);

        WindowCount {
            hits: entry.hits,
            resets_in: window.saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }

    fn sweep(&self, window: Duration, now: Instant) {
        self.windows
            .lock()
            .retain(|_, entry| now.saturating_duration_since(entry.started) < window);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub resets_in: Duration,
    pub window: Duration,
}

impl RateLimitDecision {
    /// Standard `RateLimit-*` headers, plus `Retry-After` when rejected.
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        let reset_secs = ceil_secs(self.resets_in);
        let policy = format!("{};w={}", self.limit, ceil_secs(self.window));

        if let Ok(policy) = HeaderValue::from_str(&policy) {
            headers.insert(RATELIMIT_POLICY, policy);
        }
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs));
        if !self.allowed {
            headers.insert(RETRY_AFTER, HeaderValue::from(reset_secs));
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let millis = duration.as_millis() as u64;
    millis.div_ceil(1000)
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config)
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let count = self.store.increment(key, self.config.window, now);
        RateLimitDecision {
            allowed: count.hits <= self.config.max_requests,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(count.hits),
            resets_in: count.resets_in,
            window: self.config.window,
        }
    }

    pub fn sweep(&self) {
        self.store.sweep(self.config.window, Instant::now());
    }

    pub fn window(&self) -> Duration {
        self.config.window
    }
}

fn applies_to(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !applies_to(request.uri().path()) {
        return next.run(request).await;
    }

    let client = client_key(&request);
    let decision = limiter.check(&client);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": RATE_LIMIT_MESSAGE })),
        )
            .into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}
