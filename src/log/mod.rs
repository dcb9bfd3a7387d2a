use fs_err as fs;
use serde_json::{json, to_string_pretty};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::wire::GenerationRequest;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level chosen by `--debug`.
pub fn init(debug: bool) {
    let default = if debug {
        "voiceable=debug"
    } else {
        "voiceable=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".voiceable").join("tx").join(tx.to_string())
}

/// Persist a generation request and the raw completion (or the failure) under
/// `<root>/.voiceable/tx/<id>/`.
pub fn save_stage(
    stage: &str,
    root: &Path,
    req: &GenerationRequest,
    outcome: Result<&str, &str>,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, req.transaction.id);
    fs::create_dir_all(&dir)?;

    let mut request_path = None;
    let mut response_path = None;

    if save_request {
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(req)?)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join(format!("{stage}.response.json"));
        let body = match outcome {
            Ok(content) => json!({ "ok": true, "content": content }),
            Err(error) => json!({ "ok": false, "error": error }),
        };
        fs::write(&p, to_string_pretty(&body)?)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

pub fn log_saved_paths(stage: &str, saved: &SavedPaths) {
    tracing::debug!(stage, dir = %saved.dir.display(), "transaction artifacts");
    if let Some(p) = &saved.request {
        tracing::debug!(stage, path = %p.display(), "request saved");
    }
    if let Some(p) = &saved.response {
        tracing::debug!(stage, path = %p.display(), "response saved");
    }
}
