//! Model descriptors and generation settings

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Models known to reject system-role messages. An explicit
/// `supports_system_prompt` on the descriptor overrides this table.
static NO_SYSTEM_PROMPT_MODELS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["Mistral-7B-Instruct-v0.2"]));

/// Model descriptor supplied by the application's model config
///
/// Opaque to the endpoint apart from the fields below: a display name used
/// as the fallback request identifier, an optional upstream `id`, and
/// model-level generation defaults that caller settings are merged over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Display name; doubles as the request model identifier when `id` is unset
    pub name: String,

    /// Upstream model identifier, when it differs from the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Model-level generation defaults
    #[serde(default, skip_serializing_if = "GenerationSettings::is_empty")]
    pub parameters: GenerationSettings,

    /// Whether the model accepts system-role messages; unset falls back to
    /// the known-model table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_system_prompt: Option<bool>,
}

impl ModelDescriptor {
    /// Create a descriptor with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            parameters: GenerationSettings::default(),
            supports_system_prompt: None,
        }
    }

    /// Identifier to send upstream (`id` when present, else `name`)
    #[must_use]
    pub fn request_model(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Effective system-prompt capability: explicit flag wins, otherwise
    /// the known-model table decides
    #[must_use]
    pub fn accepts_system_prompt(&self) -> bool {
        self.supports_system_prompt
            .unwrap_or_else(|| !NO_SYSTEM_PROMPT_MODELS.contains(self.name.as_str()))
    }
}

/// Generation knobs for a request
///
/// An open mapping: the three knobs the request body forwards are typed,
/// anything else rides along in `extra`. Merging is key-by-key with the
/// caller winning over model defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,

    /// Any further knobs, carried through the merge but not forwarded
    /// to the request body
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

impl GenerationSettings {
    /// True when no knob is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.max_new_tokens.is_none()
            && self.extra.is_empty()
    }

    /// Overlay `self` onto `defaults`, key-by-key; `self` wins on conflict
    #[must_use]
    pub fn merged_over(&self, defaults: &GenerationSettings) -> GenerationSettings {
        let mut merged = defaults.clone();
        if let Some(temperature) = self.temperature {
            merged.temperature = Some(temperature);
        }
        if let Some(top_p) = self.top_p {
            merged.top_p = Some(top_p);
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            merged.max_new_tokens = Some(max_new_tokens);
        }
        for (key, value) in &self.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_model_prefers_id() {
        let mut model = ModelDescriptor::new("Genta-7B");
        assert_eq!(model.request_model(), "Genta-7B");

        model.id = Some("genta-7b-v2".to_string());
        assert_eq!(model.request_model(), "genta-7b-v2");
    }

    #[test]
    fn test_system_prompt_capability_defaults() {
        assert!(ModelDescriptor::new("demo-model").accepts_system_prompt());
        assert!(!ModelDescriptor::new("Mistral-7B-Instruct-v0.2").accepts_system_prompt());
    }

    #[test]
    fn test_explicit_capability_overrides_table() {
        let mut mistral = ModelDescriptor::new("Mistral-7B-Instruct-v0.2");
        mistral.supports_system_prompt = Some(true);
        assert!(mistral.accepts_system_prompt());

        let mut demo = ModelDescriptor::new("demo-model");
        demo.supports_system_prompt = Some(false);
        assert!(!demo.accepts_system_prompt());
    }

    #[test]
    fn test_merge_caller_wins() {
        let defaults = GenerationSettings {
            temperature: Some(0.7),
            top_p: Some(0.9),
            ..GenerationSettings::default()
        };
        let caller = GenerationSettings {
            temperature: Some(0.2),
            max_new_tokens: Some(100),
            ..GenerationSettings::default()
        };

        let merged = caller.merged_over(&defaults);
        assert_eq!(merged.temperature, Some(0.2));
        assert_eq!(merged.top_p, Some(0.9));
        assert_eq!(merged.max_new_tokens, Some(100));
    }

    #[test]
    fn test_merge_extra_knobs_key_by_key() {
        let defaults: GenerationSettings =
            serde_json::from_value(json!({"repetition_penalty": 1.2, "seed": 42})).unwrap();
        let caller: GenerationSettings =
            serde_json::from_value(json!({"repetition_penalty": 1.0})).unwrap();

        let merged = caller.merged_over(&defaults);
        assert_eq!(merged.extra["repetition_penalty"], json!(1.0));
        assert_eq!(merged.extra["seed"], json!(42));
    }

    #[test]
    fn test_unknown_knobs_land_in_extra() {
        let settings: GenerationSettings =
            serde_json::from_value(json!({"temperature": 0.5, "repetition_penalty": 1.2}))
                .unwrap();
        assert_eq!(settings.temperature, Some(0.5));
        assert_eq!(settings.extra["repetition_penalty"], json!(1.2));
    }

    #[test]
    fn test_descriptor_parses_with_defaults() {
        let model: ModelDescriptor = serde_json::from_value(json!({"name": "demo"})).unwrap();
        assert_eq!(model.name, "demo");
        assert!(model.id.is_none());
        assert!(model.parameters.is_empty());
        assert!(model.supports_system_prompt.is_none());
    }
}
