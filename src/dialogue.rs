//! Dialogue tokens and `{{token}}` template substitution.

use crate::services::DialogueProvider;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: Option<String>,
    /// A dialogue key, or literal text when the provider has no entry for it.
    pub text: String,
}

impl DialogueLine {
    pub fn new(text: &str) -> Self {
        Self {
            speaker: None,
            text: text.to_string(),
        }
    }

    pub fn spoken_by(speaker: &str, text: &str) -> Self {
        Self {
            speaker: Some(speaker.to_string()),
            text: text.to_string(),
        }
    }
}

/// Token values registered by requirements and option phases for the
/// current encounter instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTokens(BTreeMap<String, String>);

impl DialogueTokens {
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replaces every `{{key}}` whose key is registered. Unknown placeholders
/// are left in place so missing tokens stay visible.
pub fn substitute(template: &str, tokens: &DialogueTokens) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = &after_open[..end];
                match tokens.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Key → template lookup backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct TemplateDialogue {
    templates: HashMap<String, String>,
}

impl TemplateDialogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: &str, template: &str) -> Self {
        self.templates.insert(key.to_string(), template.to_string());
        self
    }
}

impl DialogueProvider for TemplateDialogue {
    fn resolve(&self, key: &str, tokens: &DialogueTokens) -> String {
        let template = self.templates.get(key).map(String::as_str).unwrap_or(key);
        substitute(template, tokens)
    }
}
