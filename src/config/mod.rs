use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{Args, ProviderKind};
use crate::errors::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "voiceable.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub root: String,
    pub out_dir: String,
    pub provider: ProviderKind,
    pub model: String,
    /// Overrides the provider's default endpoint.
    pub api_base: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: Option<String>,
    pub ollama_url: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_prompt_chars: usize,
    pub history_path: Option<String>,
    pub save_request: bool,
    pub save_response: bool,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-06-01".into(),
            root: ".".into(),
            out_dir: ".".into(),
            provider: ProviderKind::OpenAI,
            model: "gpt-4o-mini".into(),
            api_base: None,
            api_key_env: None,
            ollama_url: "http://localhost:11434".into(),
            anthropic_version: "2023-06-01".into(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout_secs: 120,
            max_prompt_chars: 220,
            history_path: None,
            save_request: false,
            save_response: false,
            offline: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        Self::from_toml_str(&s, &display)
    }

    /// Explicit `--config`, else `voiceable.toml` in the working directory, else defaults.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        match explicit {
            Some(p) => Self::load(Path::new(p)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// CLI flags win over file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(out) = &args.out {
            self.out_dir = out.clone();
        }
        if let Some(p) = &args.provider {
            self.provider = p.clone();
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        self.save_request |= args.save_request;
        self.save_response |= args.save_response;
        self.offline |= args.offline;
    }

    pub fn api_key_var(&self) -> &str {
        match &self.api_key_env {
            Some(v) => v,
            None => match self.provider {
                ProviderKind::OpenAI => "OPENAI_API_KEY",
                ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
                ProviderKind::Ollama => "OLLAMA_API_KEY",
            },
        }
    }

    pub fn history_file(&self) -> PathBuf {
        match &self.history_path {
            Some(p) => PathBuf::from(p),
            None => Path::new(&self.root).join(".voiceable").join("history.sqlite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_toml_str("model = \"llama3\"\nprovider = \"ollama\"\n", "mem").unwrap();
        assert_eq!(cfg.model, "llama3");
        assert!(matches!(cfg.provider, ProviderKind::Ollama));
        assert_eq!(cfg.max_prompt_chars, 220);
        assert_eq!(cfg.api_key_var(), "OLLAMA_API_KEY");
    }

    #[test]
    fn bad_file_reports_path() {
        let err = Config::from_toml_str("timeout_secs = \"soon\"", "voiceable.toml").unwrap_err();
        assert!(err.to_string().contains("voiceable.toml"));
    }

    #[test]
    fn load_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "api_key_env = \"MY_KEY\"\nsave_request = true").unwrap();
        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.api_key_var(), "MY_KEY");
        assert!(cfg.save_request);
        assert!(Config::load(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn args_override_file() {
        let mut cfg = Config::default();
        let args = Args::parse_from(["voiceable", "--provider", "anthropic", "--offline", "--out", "dist", "--timeout-secs", "5"]);
        cfg.apply_args(&args);
        assert!(matches!(cfg.provider, ProviderKind::Anthropic));
        assert!(cfg.offline);
        assert_eq!(cfg.out_dir, "dist");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.api_key_var(), "ANTHROPIC_API_KEY");
    }

    #[test]
    fn history_defaults_under_root() {
        let cfg = Config { root: "/tmp/x".into(), ..Config::default() };
        assert_eq!(cfg.history_file(), Path::new("/tmp/x/.voiceable/history.sqlite"));
    }
}
