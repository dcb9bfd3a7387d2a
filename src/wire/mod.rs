use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::bundle::TemplateKind;
use crate::errors::ProviderError;

/// ========================================
/// Generation request/response wire format
/// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub schema_version: String,
    pub transaction: Tx,
    pub template: TemplateKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    pub instruction: Instruction,
}

/// What the remote generator is asked to return. Every field is optional;
/// the dispatcher fills gaps from the local template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApp {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dependencies: Option<Dependencies>,
    #[serde(default)]
    pub scripts: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub accessibility_features: Option<Vec<String>>,
}

/// Remote models return dependencies either as a map or as a list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependencies {
    Map(BTreeMap<String, Value>),
    List(Vec<String>),
}

impl Dependencies {
    pub fn into_map(self) -> BTreeMap<String, String> {
        match self {
            Dependencies::Map(m) => m
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s,
                        Value::Null => "*".to_string(),
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect(),
            Dependencies::List(names) => names
                .into_iter()
                .filter(|n| !n.trim().is_empty())
                .map(|n| (n, "*".to_string()))
                .collect(),
        }
    }
}

/// Parse a completion's text into a `RemoteApp`.
///
/// Tries the whole text, then a fenced ```json block, then the first balanced
/// `{...}` object.
pub fn parse_remote_app(content: &str) -> Result<RemoteApp, ProviderError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::Malformed("empty completion".into()));
    }

    if let Ok(app) = serde_json::from_str::<RemoteApp>(trimmed) {
        return Ok(app);
    }

    if let Some(block) = extract_fenced_block(trimmed) {
        if let Ok(app) = serde_json::from_str::<RemoteApp>(&block) {
            return Ok(app);
        }
    }

    // Prose may carry its own braces ahead of the payload, so every balanced
    // object is tried. An object with no known fields only wins if nothing
    // better follows.
    let mut empty = None;
    let mut last_err = None;
    for obj in json_objects(trimmed) {
        match serde_json::from_str::<RemoteApp>(obj) {
            Ok(app) if app == RemoteApp::default() => {
                empty.get_or_insert(app);
            }
            Ok(app) => return Ok(app),
            Err(e) => last_err = Some(e),
        }
    }

    match (empty, last_err) {
        (Some(app), _) => Ok(app),
        (None, Some(e)) => Err(ProviderError::Malformed(format!("invalid JSON object: {e}"))),
        (None, None) => Err(ProviderError::Malformed("no JSON object in completion".into())),
    }
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n[ \t]*```")
            .unwrap_or_else(|e| panic!("fence pattern is valid: {e}"))
    })
}

fn extract_fenced_block(s: &str) -> Option<String> {
    fence_regex()
        .captures(s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every balanced `{...}` substring, in order of its opening brace.
fn json_objects(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices()
        .filter(|&(_, c)| c == '{')
        .filter_map(move |(start, _)| balanced_object_at(s, start))
}

/// The object opening at `start`. Braces inside JSON strings are skipped;
/// returns None if it never closes.
fn balanced_object_at(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in s.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const APP: &str = r#"{"name":"News Reader","description":"Reads news","files":{"index.html":"<html>{}</html>"},"dependencies":["tailwindcss"],"scripts":{"start":"open index.html"},"accessibilityFeatures":["aria"]}"#;

    #[test]
    fn parses_plain_json() {
        let app = parse_remote_app(APP).unwrap();
        assert_eq!(app.name.as_deref(), Some("News Reader"));
        assert_eq!(app.files.unwrap()["index.html"], "<html>{}</html>");
        assert_eq!(app.accessibility_features, Some(vec!["aria".to_string()]));
    }

    #[test]
    fn parses_fenced_block() {
        let text = format!("Here is your app:\n```json\n{APP}\n```\nEnjoy!");
        let app = parse_remote_app(&text).unwrap();
        assert_eq!(app.description.as_deref(), Some("Reads news"));
    }

    #[test]
    fn parses_embedded_object_with_braces_in_strings() {
        let text = format!("Sure! {APP} Let me know if you need more.");
        let app = parse_remote_app(&text).unwrap();
        assert_eq!(app.scripts.unwrap()["start"], "open index.html");
    }

    #[test]
    fn skips_braces_in_leading_prose() {
        let text = format!("Use {{name}} tokens and {{}} blocks as needed: {APP}");
        let app = parse_remote_app(&text).unwrap();
        assert_eq!(app.name.as_deref(), Some("News Reader"));
    }

    #[test]
    fn lone_empty_object_is_accepted() {
        assert_eq!(parse_remote_app("nothing to add {}").unwrap(), RemoteApp::default());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_remote_app("I cannot help with that."), Err(ProviderError::Malformed(_))));
        assert!(matches!(parse_remote_app("   "), Err(ProviderError::Malformed(_))));
        assert!(matches!(parse_remote_app("{\"name\": "), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn missing_fields_are_none() {
        let app = parse_remote_app(r#"{"name": null, "files": {"a.html": "x"}}"#).unwrap();
        assert_eq!(app.name, None);
        assert_eq!(app.description, None);
        assert!(app.files.is_some());
    }

    #[test]
    fn dependencies_accept_both_shapes() {
        let list = Dependencies::List(vec!["tailwindcss".into(), " ".into()]).into_map();
        assert_eq!(list, BTreeMap::from([("tailwindcss".to_string(), "*".to_string())]));

        let app = parse_remote_app(r#"{"dependencies": {"react": "^18", "x": 2, "y": null}}"#).unwrap();
        let map = app.dependencies.unwrap().into_map();
        assert_eq!(map["react"], "^18");
        assert_eq!(map["x"], "2");
        assert_eq!(map["y"], "*");
    }
}
