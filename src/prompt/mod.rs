use crate::bundle::TemplateKind;

fn template_catalog() -> String {
    TemplateKind::ALL
        .iter()
        .map(|k| format!("- \"{}\": {}", k.as_str(), k.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn system_prompt() -> String {
    format!(
r#"You are VoiceAble AI, an expert at creating accessible web applications.

Your task is to generate a complete, functional, accessible web application based on the user's description and template choice.

Template types:
{catalog}

Requirements:
1. Generate COMPLETE, WORKING code, not fragments or examples.
2. Use plain HTML, CSS and JavaScript that runs by opening index.html; no build step.
3. Include proper accessibility: semantic HTML, ARIA labels and live regions, keyboard navigation, visible focus.
4. Respect prefers-reduced-motion and prefers-contrast.
5. Handle errors and unsupported browser features gracefully.
6. Keep the app self-contained; external libraries only via CDN.

Return exactly one JSON object with this structure and nothing else:
{{
  "name": "App Name",
  "description": "One-line description",
  "files": {{
    "index.html": "Complete HTML content",
    "style.css": "Complete CSS content",
    "script.js": "Complete JavaScript content",
    "README.md": "Setup and usage instructions"
  }},
  "dependencies": {{ "name": "version or source" }},
  "scripts": {{ "start": "How to start the app" }},
  "features": ["feature1", "feature2"],
  "accessibilityFeatures": ["aria-labels", "keyboard-navigation"]
}}

The "files" object MUST contain an index.html entry point."#,
        catalog = template_catalog()
    )
}

pub fn user_prompt(template: TemplateKind, prompt: &str, features: &[String]) -> String {
    let mut s = format!(
        "Create a {kind} accessibility tool: {prompt}\n\nPlease generate a complete, working web application that addresses this request. Include all necessary HTML, CSS, and JavaScript code.",
        kind = template.as_str(),
        prompt = prompt.trim(),
    );
    if !features.is_empty() {
        s.push_str("\n\nRequested features:\n");
        for f in features {
            s.push_str(" - ");
            s.push_str(f);
            s.push('\n');
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_describes_schema() {
        let s = system_prompt();
        for field in ["\"name\"", "\"description\"", "\"files\"", "\"dependencies\"", "\"scripts\"", "\"accessibilityFeatures\""] {
            assert!(s.contains(field), "missing {field}");
        }
        for kind in TemplateKind::ALL {
            assert!(s.contains(kind.as_str()));
        }
    }

    #[test]
    fn user_prompt_interpolates_kind_and_text() {
        let u = user_prompt(TemplateKind::Planner, "  weekly chores  ", &[]);
        assert!(u.starts_with("Create a planner accessibility tool: weekly chores\n"));
        assert!(!u.contains("Requested features"));

        let u = user_prompt(TemplateKind::Custom, "x", &["dark mode".into()]);
        assert!(u.contains("Requested features:\n - dark mode"));
    }
}
