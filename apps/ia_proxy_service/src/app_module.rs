use std::sync::Arc;

use ia_llm::{LLMClient, LLMClientConfig, LLMProvider, OpenRouterConfig};

use crate::config::AppConfig;
use crate::content::content_service::ContentService;
use crate::property::property_service::PropertyService;
use crate::shared::origin_policy::OriginPolicy;
use crate::shared::rate_limiter::RateLimiter;

#[derive(Clone)]
pub struct AppService {
    pub property_service: PropertyService,
    pub content_service: ContentService,
}

impl AppService {
    pub fn new(llm_client: LLMClient, config: &AppConfig) -> Self {
        Self {
            property_service: PropertyService::new(
                llm_client.clone(),
                config.property_models.clone(),
            ),
            content_service: ContentService::new(llm_client, config.content_models.clone()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub config: Arc<AppConfig>,
    pub rate_limiter: Arc<RateLimiter>,
    pub origin_policy: Arc<OriginPolicy>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let openrouter = OpenRouterConfig {
            api_key: config.api_key.clone(),
            base_url: config.upstream_base_url.clone(),
            referer: config.app_url.clone(),
            title: config.app_title.clone(),
            ..OpenRouterConfig::new(config.api_key.clone())
        };
        let llm_client = LLMClient::new(
            LLMProvider::OpenRouter(openrouter),
            Some(LLMClientConfig {
                timeout: config.upstream_timeout,
            }),
        );

        Self::with_llm_client(config, llm_client)
    }

    pub fn with_llm_client(config: AppConfig, llm_client: LLMClient) -> Self {
        Self {
            service: AppService::new(llm_client, &config),
            rate_limiter: Arc::new(RateLimiter::in_memory(config.rate_limit)),
            origin_policy: Arc::new(OriginPolicy::new(&config.allowed_origins)),
            config: Arc::new(config),
        }
    }
}
