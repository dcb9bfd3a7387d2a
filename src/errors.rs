use thiserror::Error;

/// Failures of a single remote generation attempt. Never escapes the dispatcher.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider not configured: {0}")] NotConfigured(String),
    #[error("transport error: {0}")] Transport(String),
    #[error("remote returned {status}: {body}")] Status { status: u16, body: String },
    #[error("malformed response: {0}")] Malformed(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("please describe the tool you need")] EmptyPrompt,
    #[error("description is too long ({len} characters, max {max})")] PromptTooLong { len: usize, max: usize },
    #[error("cannot {action} while at step {step}")] InvalidTransition { action: &'static str, step: u8 },
}

/// Export failures are reported to the user as retryable; the bundle stays intact.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("refusing to export unsafe file name: {0}")] UnsafeName(String),
    #[error("bundle has no HTML entry point")] NoEntryPoint,
    #[error("archive failed: {0}")] Archive(#[from] zip::result::ZipError),
    #[error("i/o failed: {0}")] Io(#[from] std::io::Error),
    #[error("manifest failed: {0}")] Manifest(#[from] serde_json::Error),
    #[error("could not open preview: {0}")] Open(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")] Read { path: String, source: std::io::Error },
    #[error("parsing config {path}: {source}")] Parse { path: String, source: toml::de::Error },
}
