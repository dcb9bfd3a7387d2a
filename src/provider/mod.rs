use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::ProviderError;
use crate::wire::GenerationRequest;

pub mod anthropic;
pub mod ollama;
pub mod openai;

/// A hosted completion endpoint. Implementations only move text; parsing and
/// fallback belong to the dispatcher.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One attempt, no retry. Returns the completion text.
    async fn complete(&self, req: &GenerationRequest) -> Result<String, ProviderError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Build the configured provider. The API key is read from the environment
/// variable named by the config, never from the config file itself.
pub fn make_provider(cfg: &Config) -> Result<DynProvider, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("http client: {e}")))?;
    let key = std::env::var(cfg.api_key_var()).ok().filter(|k| !k.trim().is_empty());

    match cfg.provider {
        ProviderKind::OpenAI => {
            let api_key = key.ok_or_else(|| {
                ProviderError::NotConfigured(format!("{} env var is not set", cfg.api_key_var()))
            })?;
            Ok(Box::new(openai::OpenAIProvider::new(client, cfg, api_key)))
        }
        ProviderKind::Anthropic => {
            let api_key = key.ok_or_else(|| {
                ProviderError::NotConfigured(format!("{} env var is not set", cfg.api_key_var()))
            })?;
            Ok(Box::new(anthropic::Anthropic::new(client, cfg, api_key)))
        }
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(client, cfg, key))),
    }
}

/// Shared response handling: non-2xx becomes `Status`, body read failures `Transport`.
pub(crate) async fn read_body(resp: reqwest::Response, who: &str) -> Result<String, ProviderError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ProviderError::Transport(format!("{who}: read body failed: {e}")))?;
    tracing::debug!(provider = who, %status, bytes = text.len(), "response received");
    if !status.is_success() {
        return Err(ProviderError::Status { status: status.as_u16(), body: truncate(&text, 500) });
    }
    Ok(text)
}

pub(crate) fn transport(who: &str, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Transport(format!("{who}: request timed out"))
    } else {
        ProviderError::Transport(format!("{who}: request failed: {e}"))
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let cfg = Config { api_key_env: Some("VOICEABLE_TEST_UNSET_KEY".into()), ..Config::default() };
        let err = make_provider(&cfg).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(ref m) if m.contains("VOICEABLE_TEST_UNSET_KEY")));
    }

    #[test]
    fn ollama_needs_no_key() {
        let cfg = Config {
            provider: ProviderKind::Ollama,
            api_key_env: Some("VOICEABLE_TEST_UNSET_KEY".into()),
            ..Config::default()
        };
        let p = make_provider(&cfg).unwrap();
        assert_eq!(p.name(), "ollama");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("hi", 5), "hi");
    }
}
