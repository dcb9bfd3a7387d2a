use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{read_body, transport, Provider};
use crate::config::Config;
use crate::errors::ProviderError;
use crate::wire::{GenerationRequest, Instruction};

pub struct Ollama {
    model: String,
    url: String,
    client: Client,
    api_key: Option<String>,
    temperature: f32,
}

impl Ollama {
    pub fn new(client: Client, cfg: &Config, api_key: Option<String>) -> Self {
        Self {
            model: cfg.model.clone(),
            url: cfg.api_base.clone().unwrap_or_else(|| cfg.ollama_url.clone()),
            client,
            api_key,
            temperature: cfg.temperature,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn to_messages(ins: &Instruction) -> Vec<Msg<'_>> {
    vec![
        Msg { role: "system", content: &ins.system },
        Msg { role: "user", content: &ins.user },
    ]
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: to_messages(&req.instruction),
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: self.temperature },
        };

        tracing::debug!(%url, model = %self.model, "POST chat");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = builder.send().await.map_err(|e| transport("ollama", e))?;
        let text = read_body(resp, "ollama").await?;

        // Some proxies return the bare completion instead of the chat envelope.
        match serde_json::from_str::<ChatResponse>(&text) {
            Ok(c) => Ok(c.message.content),
            Err(_) => Ok(text),
        }
    }
}
