use ia_llm::{LLMClient, ModelCandidate};

use super::property_request::PropertyBrief;
use crate::prompts::property_prompt::PropertyPrompt;

#[derive(Clone)]
pub struct PropertyService {
    llm_client: LLMClient,
    models: Vec<ModelCandidate>,
}

impl PropertyService {
    pub fn new(llm_client: LLMClient, models: Vec<ModelCandidate>) -> Self {
        Self { llm_client, models }
    }

    pub async fn generate(&self, brief: &PropertyBrief) -> ia_llm::Result<String> {
        let messages = PropertyPrompt::messages(brief);
        self.llm_client.complete(&messages, &self.models).await
    }
}
