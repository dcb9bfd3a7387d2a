use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_body, transport, Provider};
use crate::config::Config;
use crate::errors::ProviderError;
use crate::wire::GenerationRequest;

const DEFAULT_BASE: &str = "https://api.anthropic.com";

pub struct Anthropic {
    model: String,
    client: Client,
    api_key: String,
    api_base: String,
    api_version: String,
    max_tokens: u32,
    temperature: f32,
}

impl Anthropic {
    pub fn new(client: Client, cfg: &Config, api_key: String) -> Self {
        Self {
            model: cfg.model.clone(),
            client,
            api_key,
            api_base: cfg.api_base.clone().unwrap_or_else(|| DEFAULT_BASE.to_string()),
            api_version: cfg.anthropic_version.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        }
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = MsgRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: &req.instruction.system,
            messages: vec![Msg { role: "user", content: &req.instruction.user }],
        };

        tracing::debug!(%url, model = %self.model, "POST messages");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("anthropic", e))?;
        let text = read_body(resp, "anthropic").await?;

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Malformed(format!("anthropic envelope: {e}")))?;

        let content: String = parsed
            .content
            .into_iter()
            .filter(|b| b.r#type == "text")
            .map(|b| b.text)
            .collect();
        if content.trim().is_empty() {
            return Err(ProviderError::Malformed("anthropic: empty content".into()));
        }
        Ok(content)
    }
}
