use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{read_body, transport, Provider};
use crate::config::Config;
use crate::errors::ProviderError;
use crate::wire::GenerationRequest;

const DEFAULT_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions with a system and a user message.
pub struct OpenAIProvider {
    model: String,
    client: Client,
    api_key: String,
    api_base: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIProvider {
    pub fn new(client: Client, cfg: &Config, api_key: String) -> Self {
        Self {
            model: cfg.model.clone(),
            client,
            api_key,
            api_base: cfg.api_base.clone().unwrap_or_else(|| DEFAULT_BASE.to_string()),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        }
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": req.instruction.system },
                { "role": "user", "content": req.instruction.user }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        tracing::debug!(%url, model = %self.model, "POST chat completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("openai", e))?;
        let text = read_body(resp, "openai").await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Malformed(format!("openai envelope: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Malformed("openai: no response content".into()))
    }
}
