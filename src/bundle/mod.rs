use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The four fixed app templates. Unknown names resolve to `Custom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    ScreenReader,
    Planner,
    Medication,
    #[default]
    Custom,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::ScreenReader,
        TemplateKind::Planner,
        TemplateKind::Medication,
        TemplateKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::ScreenReader => "screen-reader",
            TemplateKind::Planner => "planner",
            TemplateKind::Medication => "medication",
            TemplateKind::Custom => "custom",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TemplateKind::ScreenReader => "Screen Reader",
            TemplateKind::Planner => "Daily Planner",
            TemplateKind::Medication => "Medication Reminder",
            TemplateKind::Custom => "Custom Tool",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            TemplateKind::ScreenReader => "Reads text aloud with adjustable speed and keyboard shortcuts",
            TemplateKind::Planner => "Task list with add, complete and delete, saved in the browser",
            TemplateKind::Medication => "Medication schedule with reminders and taken/not-taken tracking",
            TemplateKind::Custom => "General purpose accessible tool built around your description",
        }
    }

    pub fn keywords(&self) -> Vec<String> {
        let extra: &[&str] = match self {
            TemplateKind::ScreenReader => &["screen-reader", "text-to-speech"],
            TemplateKind::Planner => &["planner", "tasks"],
            TemplateKind::Medication => &["medication", "reminder", "health"],
            TemplateKind::Custom => &["tool"],
        };
        ["accessibility", "a11y"]
            .iter()
            .chain(extra)
            .map(|s| s.to_string())
            .collect()
    }

    /// Lenient lookup used for user input and remote payloads.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "screen-reader" | "screenreader" | "reader" => TemplateKind::ScreenReader,
            "planner" | "daily-planner" | "tasks" => TemplateKind::Planner,
            "medication" | "medication-reminder" | "meds" => TemplateKind::Medication,
            _ => TemplateKind::Custom,
        }
    }
}

impl FromStr for TemplateKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a bundle is made of before it gets an identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleParts {
    pub name: String,
    pub description: String,
    pub template_kind: TemplateKind,
    pub files: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub accessibility_features: Vec<String>,
}

/// A generated app. Immutable once built; later steps only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBundle {
    id: Uuid,
    name: String,
    description: String,
    template_kind: TemplateKind,
    files: BTreeMap<String, String>,
    dependencies: BTreeMap<String, String>,
    scripts: BTreeMap<String, String>,
    features: Vec<String>,
    accessibility_features: Vec<String>,
    instructions: String,
    created_at: DateTime<Utc>,
}

impl GeneratedBundle {
    pub fn build(parts: BundleParts) -> Self {
        let instructions = usage_instructions(&parts);
        Self {
            id: Uuid::new_v4(),
            name: parts.name,
            description: parts.description,
            template_kind: parts.template_kind,
            files: parts.files,
            dependencies: parts.dependencies,
            scripts: parts.scripts,
            features: parts.features,
            accessibility_features: parts.accessibility_features,
            instructions,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn template_kind(&self) -> TemplateKind {
        self.template_kind
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.dependencies
    }

    pub fn scripts(&self) -> &BTreeMap<String, String> {
        &self.scripts
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn accessibility_features(&self) -> &[String] {
        &self.accessibility_features
    }

    /// How to open and run the app, rendered when the bundle is built.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of the content fields, to compare bundles regardless of identity.
    #[cfg(test)]
    pub fn parts(&self) -> BundleParts {
        BundleParts {
            name: self.name.clone(),
            description: self.description.clone(),
            template_kind: self.template_kind,
            files: self.files.clone(),
            dependencies: self.dependencies.clone(),
            scripts: self.scripts.clone(),
            features: self.features.clone(),
            accessibility_features: self.accessibility_features.clone(),
        }
    }

    /// `index.html` when present, otherwise the first HTML file by name.
    pub fn entry_point(&self) -> Option<&str> {
        entry_point_of(&self.files)
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

pub fn is_html(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Blank HTML files never count as an entry point.
pub fn entry_point_of(files: &BTreeMap<String, String>) -> Option<&str> {
    if files.get("index.html").is_some_and(|body| !body.trim().is_empty()) {
        return Some("index.html");
    }
    files
        .iter()
        .find(|(name, body)| is_html(name) && !body.trim().is_empty())
        .map(|(name, _)| name.as_str())
}

/// Lowercase, non-alphanumerics collapsed into single dashes.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "accessible-tool".to_string()
    } else {
        trimmed.to_string()
    }
}

fn usage_instructions(parts: &BundleParts) -> String {
    let entry = entry_point_of(&parts.files).unwrap_or("index.html");
    let mut s = format!("# {}\n\n{}\n\n", parts.name, parts.description);
    if !parts.features.is_empty() {
        s.push_str(&format!("Features: {}\n\n", parts.features.join(", ")));
    }
    if !parts.accessibility_features.is_empty() {
        s.push_str(&format!("Accessibility: {}\n\n", parts.accessibility_features.join(", ")));
    }
    s.push_str("To use this app:\n");
    s.push_str("1. Extract the downloaded files\n");
    s.push_str(&format!("2. Open {entry} in a web browser\n"));
    s.push_str("3. The app is ready to use!\n");
    if !parts.scripts.is_empty() {
        s.push_str("\nScripts:\n");
        for (k, v) in &parts.scripts {
            s.push_str(&format!("- {k}: {v}\n"));
        }
    }
    s
}
