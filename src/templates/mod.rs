use std::collections::BTreeMap;

use crate::bundle::{slugify, BundleParts, GeneratedBundle, TemplateKind};

mod custom;
mod medication;
mod planner;
mod screen_reader;

const STOP_WORDS: [&str; 12] = [
    "the", "and", "for", "with", "that", "this", "need", "want", "help", "tool", "create", "make",
];

const FALLBACK_NAME: &str = "Accessible Tool";

/// Values a template body may reference as `{{key}}`.
pub(crate) struct Context {
    pub name: String,
    pub slug: String,
    /// HTML-escaped user description.
    pub prompt: String,
    pub kind: TemplateKind,
}

impl Context {
    fn new(prompt: &str, kind: TemplateKind) -> Self {
        let name = app_name(prompt);
        let shown = if prompt.trim().is_empty() { kind.summary() } else { prompt.trim() };
        Self { slug: slugify(&name), prompt: html_escape(shown), name, kind }
    }

    fn value(&self, key: &str) -> Option<String> {
        match key {
            "base_css" => Some(BASE_CSS.to_string()),
            "name" => Some(html_escape(&self.name)),
            "slug" => Some(self.slug.clone()),
            "prompt" => Some(self.prompt.clone()),
            "kind" => Some(self.kind.as_str().to_string()),
            "kind_title" => Some(self.kind.title().to_string()),
            _ => None,
        }
    }

    /// Single pass over the template, so substituted text is never rescanned.
    /// Unknown keys are left as written.
    pub fn fill(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + BASE_CSS.len());
        let mut rest = template;
        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => match self.value(&after[..close]) {
                    Some(v) => {
                        out.push_str(&v);
                        rest = &after[close + 2..];
                    }
                    None => {
                        out.push_str("{{");
                        rest = after;
                    }
                },
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Deterministic bundle for `(prompt, kind)`. Any prompt yields a renderable app.
pub fn generate(prompt: &str, kind: TemplateKind) -> GeneratedBundle {
    GeneratedBundle::build(parts(prompt, kind))
}

/// Content of the local bundle, without an identity.
pub fn parts(prompt: &str, kind: TemplateKind) -> BundleParts {
    let ctx = Context::new(prompt, kind);
    let spec = match kind {
        TemplateKind::ScreenReader => screen_reader::spec(),
        TemplateKind::Planner => planner::spec(),
        TemplateKind::Medication => medication::spec(),
        TemplateKind::Custom => custom::spec(),
    };

    let mut files = BTreeMap::new();
    files.insert("index.html".to_string(), ctx.fill(spec.html));
    files.insert("README.md".to_string(), readme(&ctx, &spec));

    let description = if prompt.trim().is_empty() {
        format!("An accessible {} application", kind.title().to_lowercase())
    } else {
        format!("An accessible {} application: {}", kind.title().to_lowercase(), prompt.trim())
    };

    BundleParts {
        name: ctx.name.clone(),
        description,
        template_kind: kind,
        files,
        dependencies: BTreeMap::new(),
        scripts: [
            ("start".to_string(), "Open index.html in a web browser".to_string()),
            ("serve".to_string(), "python3 -m http.server 3000".to_string()),
        ]
        .into_iter()
        .collect(),
        features: to_strings(spec.features),
        accessibility_features: to_strings(&ACCESSIBILITY),
    }
}

/// Up to three significant words of the prompt, title-cased.
pub fn app_name(prompt: &str) -> String {
    let words: Vec<String> = prompt
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .take(3)
        .collect();

    if words.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const ACCESSIBILITY: [&str; 5] = [
    "ARIA labels and live regions",
    "Keyboard navigation",
    "Visible focus indicators",
    "High contrast support",
    "Reduced motion support",
];

/// Static pieces a template module contributes.
pub(crate) struct TemplateSpec {
    pub html: &'static str,
    pub features: &'static [&'static str],
    pub usage: &'static [&'static str],
}

fn readme(ctx: &Context, spec: &TemplateSpec) -> String {
    let mut s = format!(
        "# {name}\n\nAn accessible {kind} application generated by VoiceAble.\n\n## Description\n{prompt}\n\n## Features\n",
        name = ctx.name,
        kind = ctx.kind.title().to_lowercase(),
        prompt = ctx.prompt,
    );
    for f in spec.features {
        s.push_str(&format!("- {f}\n"));
    }
    s.push_str("\n## Usage\n");
    for (i, step) in spec.usage.iter().enumerate() {
        s.push_str(&format!("{}. {step}\n", i + 1));
    }
    s.push_str("\n## Accessibility\n");
    for a in ACCESSIBILITY {
        s.push_str(&format!("- {a}\n"));
    }
    s.push_str("\n## Browser Support\nModern browsers (Chrome, Firefox, Safari, Edge) and screen readers (NVDA, JAWS, VoiceOver).\n");
    s
}

/// Style shared by every template; spliced in with `{{base_css}}`.
pub(crate) const BASE_CSS: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: #f5f5f5;
            color: #1f2937;
        }
        .container { background: #fff; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { color: #1d4ed8; margin-bottom: 10px; }
        .lead { color: #4b5563; margin-bottom: 20px; }
        button {
            padding: 12px 20px;
            font-size: 16px;
            border: none;
            border-radius: 6px;
            cursor: pointer;
            background: #2563eb;
            color: #fff;
        }
        button:hover { background: #1d4ed8; }
        button:disabled { background: #9ca3af; cursor: not-allowed; }
        button.secondary { background: #6b7280; }
        button.danger { background: #b91c1c; }
        input, textarea {
            width: 100%;
            padding: 12px;
            font-size: 16px;
            border: 2px solid #d1d5db;
            border-radius: 6px;
            font-family: inherit;
        }
        *:focus { outline: 3px solid #93c5fd; outline-offset: 2px; }
        .row { display: flex; gap: 10px; margin: 16px 0; flex-wrap: wrap; }
        .status { margin-top: 16px; padding: 10px; border-radius: 6px; background: #eff6ff; }
        .sr-only { position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0 0 0 0); }
        @media (prefers-contrast: high) {
            body { background: #fff; color: #000; }
            button { background: #000; }
        }
        @media (prefers-reduced-motion: reduce) {
            * { animation-duration: 0.01ms !important; transition-duration: 0.01ms !important; }
        }"#;
