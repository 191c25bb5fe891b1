use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod fallback;
pub mod openrouter;
pub mod parser;

pub use error::{LlmError, Result};
pub use fallback::{FallbackPolicy, FallbackState};
pub use openrouter::{OpenRouterConfig, OpenRouterService};
pub use parser::{parse_posts, SocialPost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelCandidate(String);

impl ModelCandidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelCandidate {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone)]
pub enum LLMProvider {
    OpenRouter(OpenRouterConfig),
}

#[async_trait]
pub trait LLMService: Send + Sync {
    async fn call_model(
        &self,
        messages: &[ChatMessage],
        model: &ModelCandidate,
        timeout: Duration,
    ) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct LLMClientConfig {
    pub timeout: Duration,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
        }
    }
}

#[derive(Clone)]
pub struct LLMClient {
    service: Arc<dyn LLMService>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(provider: LLMProvider, config: Option<LLMClientConfig>) -> Self {
        let service: Arc<dyn LLMService> = match provider {
            LLMProvider::OpenRouter(openrouter) => Arc::new(OpenRouterService::new(openrouter)),
        };

        Self::with_service(service, config)
    }

    pub fn with_service(service: Arc<dyn LLMService>, config: Option<LLMClientConfig>) -> Self {
        Self {
            service,
            config: config.unwrap_or_default(),
        }
    }

    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        candidates: &[ModelCandidate],
    ) -> Result<String> {
        self.complete_with(messages, candidates, Ok).await
    }

    /// An answer only counts once it is non-blank and `parse` accepts it.
    /// Anything else moves on to the next candidate.
    pub async fn complete_with<T, F>(
        &self,
        messages: &[ChatMessage],
        candidates: &[ModelCandidate],
        parse: F,
    ) -> Result<T>
    where
        F: Fn(String) -> Result<T>,
    {
        let mut policy = FallbackPolicy::new(candidates);

        while let Some(model) = policy.next_candidate() {
            let attempt = self
                .service
                .call_model(messages, model, self.config.timeout)
                .await
                .and_then(|raw| {
                    if raw.trim().is_empty() {
                        Err(LlmError::EmptyResponse {
                            model: model.to_string(),
                        })
                    } else {
                        parse(raw)
                    }
                });

            match attempt {
                Ok(value) => {
                    policy.record_success();
                    tracing::info!(model = %model, "Model produced usable output");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Model attempt failed, trying next candidate");
                    policy.record_failure(e);
                }
            }
        }

        let error = policy.into_error();
        tracing::error!(error = %error, "Every candidate model failed");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedService {
        script: Mutex<Vec<Result<String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(mut script: Vec<Result<String>>) -> Arc<Self> {
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMService for ScriptedService {
        async fn call_model(
            &self,
            _messages: &[ChatMessage],
            model: &ModelCandidate,
            _timeout: Duration,
        ) -> Result<String> {
            self.calls.lock().unwrap().push(model.to_string());
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(LlmError::EmptyResponse {
                    model: model.to_string(),
                }))
        }
    }

    fn candidates() -> Vec<ModelCandidate> {
        ["m1", "m2", "m3", "m4"].into_iter().map(ModelCandidate::from).collect()
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("sys"), ChatMessage::user("hola")]
    }

    #[tokio::test]
    async fn falls_through_three_failures_to_the_fourth_model() {
        let service = ScriptedService::new(vec![
            Err(LlmError::Transport {
                model: "m1".to_string(),
                message: "connection refused".to_string(),
            }),
            Err(LlmError::Status {
                model: "m2".to_string(),
                status: 502,
                body: "bad gateway".to_string(),
            }),
            Err(LlmError::EmptyResponse {
                model: "m3".to_string(),
            }),
            Ok("Una casa preciosa".to_string()),
        ]);
        let client = LLMClient::with_service(service.clone(), None);

        let text = client.complete(&messages(), &candidates()).await.unwrap();

        assert_eq!(text, "Una casa preciosa");
        assert_eq!(service.calls(), vec!["m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let service = ScriptedService::new(vec![Ok("primero".to_string())]);
        let client = LLMClient::with_service(service.clone(), None);

        let text = client.complete(&messages(), &candidates()).await.unwrap();

        assert_eq!(text, "primero");
        assert_eq!(service.calls(), vec!["m1"]);
    }

    #[tokio::test]
    async fn exhaustion_reports_the_last_failure() {
        let service = ScriptedService::new(vec![
            Err(LlmError::Timeout {
                model: "m1".to_string(),
                timeout: Duration::from_millis(30_000),
            }),
            Err(LlmError::Status {
                model: "m2".to_string(),
                status: 429,
                body: "rate limited".to_string(),
            }),
        ]);
        let client = LLMClient::with_service(service.clone(), None);
        let two = &candidates()[..2];

        let error = client.complete(&messages(), two).await.unwrap_err();

        assert!(matches!(error, LlmError::Exhausted(_)));
        assert_eq!(error.details(), "Model m2 returned status 429: rate limited");
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn blank_answers_never_count_as_success() {
        let service = ScriptedService::new(vec![
            Ok("   ".to_string()),
            Ok("\n\t".to_string()),
            Ok("Ático con terraza".to_string()),
        ]);
        let client = LLMClient::with_service(service.clone(), None);

        let text = client.complete(&messages(), &candidates()).await.unwrap();

        assert_eq!(text, "Ático con terraza");
        assert_eq!(service.calls(), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn blank_answers_from_every_model_exhaust() {
        let service = ScriptedService::new(vec![Ok(" ".to_string()), Ok(String::new())]);
        let client = LLMClient::with_service(service.clone(), None);

        let error = client
            .complete(&messages(), &candidates()[..2])
            .await
            .unwrap_err();

        assert_eq!(error.details(), "Model m2 returned an empty response");
    }

    #[tokio::test]
    async fn empty_candidate_list_reports_generic_exhaustion() {
        let service = ScriptedService::new(vec![]);
        let client = LLMClient::with_service(service.clone(), None);

        let error = client.complete(&messages(), &[]).await.unwrap_err();

        assert!(matches!(error, LlmError::NoCandidates));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn parse_failures_advance_to_the_next_model() {
        let service = ScriptedService::new(vec![
            Ok("No puedo ayudar con eso".to_string()),
            Ok("[]".to_string()),
            Ok(r##"[{"content":"hola","hashtags":["#a"]}]"##.to_string()),
        ]);
        let client = LLMClient::with_service(service.clone(), None);

        let posts = client
            .complete_with(&messages(), &candidates(), |raw| parse_posts(&raw))
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(service.calls(), vec!["m1", "m2", "m3"]);
    }
}
