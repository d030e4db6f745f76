use anyhow::{Result, anyhow};
use std::collections::HashMap;

pub const COPYRIGHT: &str = "dbsandbox - database sandbox administration";

/// Placeholder installed at the deletion-script path while a sandbox is
/// locked. It tells the operator exactly how to reverse the lock.
const SB_LOCKED_TEMPLATE: &str = r#"#!/bin/sh
# {{Copyright}}
# Version {{AppVersion}} - generated {{Timestamp}}
# Sandbox {{SandboxDir}} is locked. The original '{{ClearCmd}}' script is
# preserved as '{{NoClearCmd}}' and will be restored by unlocking.
echo "Sandbox {{SandboxDir}} is locked"
echo "The '{{ClearCmd}}' command has been disabled"
echo "To unlock it, run 'dbsandbox unlock {{SandboxDir}}'"
"#;

/// Named script templates, passed explicitly to whoever renders them. Kept
/// as a value rather than a process-wide registry so callers declare the
/// dependency.
pub struct TemplateSet {
    templates: HashMap<&'static str, &'static str>,
}

impl TemplateSet {
    pub fn standard() -> Self {
        let mut templates = HashMap::new();
        templates.insert("sb_locked", SB_LOCKED_TEMPLATE);
        TemplateSet { templates }
    }

    /// Substitutes every `{{Key}}` token from `values` into the named
    /// template. An unknown template name or a token left unresolved is an
    /// error.
    pub fn render(
        &self,
        name: &str,
        values: &HashMap<&str, String>,
    ) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| anyhow!("Unknown template: {}", name))?;

        let mut text = (*template).to_string();
        for (key, value) in values {
            text = text.replace(&format!("{{{{{}}}}}", key), value);
        }

        if let Some(start) = text.find("{{") {
            let rest = &text[start..];
            let token = rest.split("}}").next().unwrap_or(rest);
            return Err(anyhow!(
                "Template {} has an unresolved token: {}}}}}",
                name,
                token
            ));
        }

        Ok(text)
    }
}
