use ia_llm::{parse_posts, LLMClient, ModelCandidate, SocialPost};

use super::content_request::ContentBrief;
use crate::prompts::content_prompt::ContentPrompt;

#[derive(Clone)]
pub struct ContentService {
    llm_client: LLMClient,
    models: Vec<ModelCandidate>,
}

impl ContentService {
    pub fn new(llm_client: LLMClient, models: Vec<ModelCandidate>) -> Self {
        Self { llm_client, models }
    }

    pub async fn generate(&self, brief: &ContentBrief) -> ia_llm::Result<Vec<SocialPost>> {
        let messages = ContentPrompt::messages(brief);
        self.llm_client
            .complete_with(&messages, &self.models, |raw| parse_posts(&raw))
            .await
    }
}
