use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

use crate::bundle::{entry_point_of, BundleParts, GeneratedBundle, TemplateKind};
use crate::config::Config;
use crate::errors::ProviderError;
use crate::provider::{make_provider, DynProvider};
use crate::safety::filename_is_safe;
use crate::templates;
use crate::wire::{parse_remote_app, GenerationRequest, Instruction, RemoteApp, Tx};
use crate::{log, prompt};

struct Artifacts {
    root: PathBuf,
    save_request: bool,
    save_response: bool,
}

/// Tries the remote generator once and always hands back a usable bundle.
pub struct Dispatcher {
    provider: Option<DynProvider>,
    schema_version: String,
    artifacts: Option<Artifacts>,
}

impl Dispatcher {
    pub fn new(provider: Option<DynProvider>) -> Self {
        Self { provider, schema_version: Config::default().schema_version, artifacts: None }
    }

    /// Local templates only.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// A provider that cannot be built (e.g. missing API key) means offline.
    pub fn from_config(cfg: &Config) -> Self {
        let mut d = if cfg.offline {
            Self::offline()
        } else {
            match make_provider(cfg) {
                Ok(p) => Self::new(Some(p)),
                Err(e) => {
                    tracing::warn!(error = %e, "remote generation unavailable, using built-in templates");
                    Self::offline()
                }
            }
        };
        d.schema_version = cfg.schema_version.clone();
        if cfg.save_request || cfg.save_response {
            d.artifacts = Some(Artifacts {
                root: PathBuf::from(&cfg.root),
                save_request: cfg.save_request,
                save_response: cfg.save_response,
            });
        }
        d
    }

    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.as_ref().map(|p| p.name()).unwrap_or("built-in")
    }

    pub fn request(&self, prompt_text: &str, kind: TemplateKind, features: &[String]) -> GenerationRequest {
        GenerationRequest {
            schema_version: self.schema_version.clone(),
            transaction: Tx { id: Uuid::new_v4(), timestamp: Utc::now() },
            template: kind,
            prompt: prompt_text.to_string(),
            features: features.to_vec(),
            instruction: Instruction {
                system: prompt::system_prompt(),
                user: prompt::user_prompt(kind, prompt_text, features),
            },
        }
    }

    /// Never fails: transport errors and malformed answers fall back to the
    /// local template for the same `(prompt, kind)`.
    pub async fn generate(&self, prompt_text: &str, kind: TemplateKind, features: &[String]) -> GeneratedBundle {
        match self.try_remote(prompt_text, kind, features).await {
            Ok(remote) => {
                tracing::info!(provider = self.provider_name(), "remote generation succeeded");
                GeneratedBundle::build(merge(remote, templates::parts(prompt_text, kind)))
            }
            Err(ProviderError::NotConfigured(reason)) => {
                tracing::debug!(%reason, "generating locally");
                templates::generate(prompt_text, kind)
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote generation failed, using built-in template");
                templates::generate(prompt_text, kind)
            }
        }
    }

    async fn try_remote(&self, prompt_text: &str, kind: TemplateKind, features: &[String]) -> Result<RemoteApp, ProviderError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("offline".into()))?;

        let req = self.request(prompt_text, kind, features);
        let outcome = provider.complete(&req).await;
        self.save(&req, &outcome);
        parse_remote_app(&outcome?)
    }

    fn save(&self, req: &GenerationRequest, outcome: &Result<String, ProviderError>) {
        let Some(a) = &self.artifacts else { return };
        let err_text;
        let result = match outcome {
            Ok(content) => Ok(content.as_str()),
            Err(e) => {
                err_text = e.to_string();
                Err(err_text.as_str())
            }
        };
        match log::save_stage("generate", &a.root, req, result, a.save_request, a.save_response) {
            Ok(saved) => log::log_saved_paths("generate", &saved),
            Err(e) => tracing::warn!(error = %e, "could not save transaction artifacts"),
        }
    }
}

/// Fill every field the remote answer left out from the local template.
pub fn merge(remote: RemoteApp, local: BundleParts) -> BundleParts {
    let files = remote
        .files
        .map(|files| {
            files
                .into_iter()
                .filter(|(name, _)| {
                    let ok = filename_is_safe(name);
                    if !ok {
                        tracing::warn!(file = %name, "dropping unsafe file name from remote bundle");
                    }
                    ok
                })
                .collect()
        })
        .filter(|files| entry_point_of(files).is_some())
        .unwrap_or(local.files);

    BundleParts {
        name: non_blank(remote.name).unwrap_or(local.name),
        description: non_blank(remote.description).unwrap_or(local.description),
        template_kind: local.template_kind,
        files,
        dependencies: remote.dependencies.map(|d| d.into_map()).unwrap_or(local.dependencies),
        scripts: remote.scripts.unwrap_or(local.scripts),
        features: remote.features.unwrap_or(local.features),
        accessibility_features: remote.accessibility_features.unwrap_or(local.accessibility_features),
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Canned {
        reply: Result<String, fn() -> ProviderError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Provider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(&self, _req: &GenerationRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn dispatcher(reply: Result<String, fn() -> ProviderError>) -> (Dispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Canned { reply, calls: calls.clone() };
        (Dispatcher::new(Some(Box::new(p))), calls)
    }

    #[tokio::test]
    async fn transport_failure_equals_local_bundle() {
        let (d, calls) = dispatcher(Err(|| ProviderError::Transport("connection refused".into())));
        for kind in TemplateKind::ALL {
            let got = d.generate("screen reader for news articles", kind, &[]).await;
            let want = templates::generate("screen reader for news articles", kind);
            assert_eq!(got.parts(), want.parts());
            assert_eq!(got.instructions(), want.instructions());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4, "exactly one attempt per generation");
    }

    #[tokio::test]
    async fn malformed_response_equals_local_bundle() {
        let (d, _) = dispatcher(Ok("Sorry, I can't do that.".into()));
        let got = d.generate("Create a medication reminder", TemplateKind::Medication, &[]).await;
        assert_eq!(got.parts(), templates::parts("Create a medication reminder", TemplateKind::Medication));
    }

    #[tokio::test]
    async fn offline_equals_local_bundle() {
        let d = Dispatcher::offline();
        assert!(!d.is_online());
        let got = d.generate("week planner", TemplateKind::Planner, &[]).await;
        assert_eq!(got.parts(), templates::parts("week planner", TemplateKind::Planner));
    }

    #[tokio::test]
    async fn partial_remote_fields_are_filled_locally() {
        let reply = "```json\n{\"name\": \"News Voice\", \"description\": null, \"dependencies\": [\"tailwindcss\"]}\n```";
        let (d, _) = dispatcher(Ok(reply.into()));
        let got = d.generate("screen reader for news articles", TemplateKind::ScreenReader, &[]).await;
        let local = templates::parts("screen reader for news articles", TemplateKind::ScreenReader);

        assert_eq!(got.name(), "News Voice");
        assert_eq!(got.description(), local.description);
        assert_eq!(got.files(), &local.files);
        assert_eq!(got.scripts(), &local.scripts);
        assert_eq!(got.dependencies()["tailwindcss"], "*");
        assert_eq!(got.template_kind(), TemplateKind::ScreenReader);
        assert!(got.instructions().starts_with("# News Voice"));
    }

    #[tokio::test]
    async fn remote_files_are_used_when_they_have_an_entry_point() {
        let reply = r#"{"files": {"index.html": "<html>remote</html>", "../evil.sh": "rm -rf /", "script.js": "1"}}"#;
        let (d, _) = dispatcher(Ok(reply.into()));
        let got = d.generate("anything", TemplateKind::Custom, &[]).await;
        let names: Vec<_> = got.files().keys().cloned().collect();
        assert_eq!(names, vec!["index.html".to_string(), "script.js".to_string()]);
        assert_eq!(got.files()["index.html"], "<html>remote</html>");
    }

    #[test]
    fn remote_files_without_html_fall_back() {
        let local = templates::parts("pill planner", TemplateKind::Medication);
        let remote = RemoteApp {
            files: Some(BTreeMap::from([("README.md".to_string(), "hi".to_string())])),
            ..Default::default()
        };
        let merged = merge(remote, local.clone());
        assert_eq!(merged.files, local.files);
    }

    #[test]
    fn remote_blank_html_entry_falls_back() {
        let local = templates::parts("week planner", TemplateKind::Planner);
        let remote = parse_remote_app(r#"{"name":"Blank","files":{"index.html":"  ","style.css":"body{}"}}"#).unwrap();
        let merged = merge(remote, local.clone());
        assert_eq!(merged.name, "Blank");
        assert_eq!(merged.files, local.files);

        let bundle = GeneratedBundle::build(merged);
        let entry = bundle.entry_point().unwrap();
        assert!(!bundle.files()[entry].trim().is_empty());
    }

    #[test]
    fn blank_names_are_ignored() {
        let local = templates::parts("pill planner", TemplateKind::Medication);
        let remote = RemoteApp { name: Some("   ".into()), ..Default::default() };
        assert_eq!(merge(remote, local.clone()).name, local.name);
    }

    #[test]
    fn request_carries_prompts() {
        let d = Dispatcher::offline();
        let req = d.request("read my mail", TemplateKind::ScreenReader, &["large text".into()]);
        assert!(req.instruction.system.contains("\"files\""));
        assert!(req.instruction.user.contains("screen-reader"));
        assert!(req.instruction.user.contains("large text"));
    }

    #[tokio::test]
    async fn artifacts_are_saved_when_enabled() {
        let root = tempfile::tempdir().unwrap();
        let (mut d, _) = dispatcher(Err(|| ProviderError::Status { status: 500, body: "boom".into() }));
        d.artifacts = Some(Artifacts { root: root.path().to_path_buf(), save_request: true, save_response: true });
        d.generate("planner", TemplateKind::Planner, &[]).await;
        let tx_root = root.path().join(".voiceable").join("tx");
        let dirs: Vec<_> = std::fs::read_dir(&tx_root).unwrap().collect();
        assert_eq!(dirs.len(), 1);
    }

    #[test]
    fn from_config_offline_has_no_provider() {
        let cfg = Config { offline: true, ..Config::default() };
        assert!(!Dispatcher::from_config(&cfg).is_online());
    }
}
