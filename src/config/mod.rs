//! Endpoint configuration
//!
//! Parses and validates the raw endpoint parameters the application's model
//! config hands over (untyped JSON, the same shape the original schema
//! layer validated) into an immutable [`EndpointConfig`]. Parameters can
//! also be loaded from a JSON config file.

pub mod models;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::models::{GenerationSettings, ModelDescriptor};
use crate::error::{GentaError, Result};

/// Fixed upstream chat-completions URL
pub const GENTA_API_URL: &str = "https://api.genta.tech/v1/chat/completions";

/// Environment variable supplying the default API key
pub const API_KEY_ENV: &str = "GENTA_API_KEY";

/// Endpoint kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Genta,
}

impl EndpointKind {
    /// Wire name of the kind tag
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Genta => "genta",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated endpoint configuration; immutable once constructed
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Relative selection weight used by the caller's endpoint registry
    pub weight: u32,

    /// Model the endpoint generates with
    pub model: ModelDescriptor,

    /// Kind discriminator (always `genta` here)
    pub kind: EndpointKind,

    /// Raw API key sent in the Authorization header
    pub api_key: String,

    /// Upstream chat-completions URL; [`GENTA_API_URL`] unless overridden
    pub url: String,
}

/// Untrusted parameters as they arrive; every field is validated separately
/// so errors can name the field that violated its constraint.
#[derive(Debug, Deserialize)]
struct RawEndpointParameters {
    #[serde(default)]
    weight: Option<Value>,
    #[serde(default)]
    model: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default, alias = "apiKey")]
    api_key: Option<Value>,
    #[serde(default)]
    url: Option<Value>,
}

fn invalid(field: &str, message: impl Into<String>) -> GentaError {
    GentaError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

impl EndpointConfig {
    /// Validate raw endpoint parameters
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field: non-positive
    /// or non-integer `weight`, missing or wrong `type` discriminator, a
    /// model without a name, a non-string `api_key` (or none supplied and
    /// [`API_KEY_ENV`] unset), or a non-string `url`.
    pub fn from_value(params: Value) -> Result<Self> {
        let raw: RawEndpointParameters = serde_json::from_value(params)
            .map_err(|e| invalid("parameters", e.to_string()))?;

        Ok(Self {
            weight: parse_weight(raw.weight.as_ref())?,
            kind: parse_kind(raw.kind.as_ref())?,
            model: parse_model(raw.model)?,
            api_key: parse_api_key(raw.api_key)?,
            url: parse_url(raw.url.as_ref())?,
        })
    }

    /// Load endpoint parameters from a JSON config file
    ///
    /// # Errors
    ///
    /// Returns a parse error carrying the path when the file cannot be read
    /// or is not valid JSON, and the same validation errors as
    /// [`EndpointConfig::from_value`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| GentaError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let params: Value =
            serde_json::from_str(&contents).map_err(|e| GentaError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_value(params)
    }
}

/// Default endpoint config file location
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("genta")
        .join("config.json")
}

fn parse_weight(weight: Option<&Value>) -> Result<u32> {
    let Some(weight) = weight else {
        return Ok(1);
    };
    let n = weight
        .as_i64()
        .ok_or_else(|| invalid("weight", "must be an integer"))?;
    if n <= 0 {
        return Err(invalid("weight", "must be a positive integer"));
    }
    u32::try_from(n).map_err(|_| invalid("weight", "out of range"))
}

fn parse_kind(kind: Option<&Value>) -> Result<EndpointKind> {
    let tag = kind
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("type", "missing endpoint kind tag"))?;
    if tag != EndpointKind::Genta.as_str() {
        return Err(invalid("type", format!("expected \"genta\", got \"{tag}\"")));
    }
    Ok(EndpointKind::Genta)
}

fn parse_model(model: Option<Value>) -> Result<ModelDescriptor> {
    let model = model.ok_or_else(|| invalid("model", "missing model descriptor"))?;
    let model: ModelDescriptor =
        serde_json::from_value(model).map_err(|e| invalid("model", e.to_string()))?;
    if model.name.is_empty() {
        return Err(invalid("model", "name must not be empty"));
    }
    Ok(model)
}

fn parse_api_key(api_key: Option<Value>) -> Result<String> {
    match api_key {
        Some(Value::String(key)) => Ok(key),
        Some(_) => Err(invalid("api_key", "must be a string")),
        None => std::env::var(API_KEY_ENV)
            .map_err(|_| invalid("api_key", format!("not supplied and {API_KEY_ENV} is unset"))),
    }
}

fn parse_url(url: Option<&Value>) -> Result<String> {
    match url {
        Some(Value::String(url)) if !url.is_empty() => Ok(url.clone()),
        Some(_) => Err(invalid("url", "must be a non-empty string")),
        None => Ok(GENTA_API_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_params() -> Value {
        json!({
            "type": "genta",
            "model": {"name": "demo-model"},
            "api_key": "secret"
        })
    }

    #[test]
    fn test_minimal_params_apply_defaults() {
        let config = EndpointConfig::from_value(minimal_params()).unwrap();
        assert_eq!(config.weight, 1);
        assert_eq!(config.kind, EndpointKind::Genta);
        assert_eq!(config.model.name, "demo-model");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.url, GENTA_API_URL);
    }

    #[test]
    fn test_full_params() {
        let config = EndpointConfig::from_value(json!({
            "weight": 3,
            "type": "genta",
            "model": {
                "name": "Genta-7B",
                "id": "genta-7b-v2",
                "parameters": {"temperature": 0.7}
            },
            "api_key": "secret",
            "url": "http://localhost:9000/v1/chat/completions"
        }))
        .unwrap();

        assert_eq!(config.weight, 3);
        assert_eq!(config.model.request_model(), "genta-7b-v2");
        assert_eq!(config.model.parameters.temperature, Some(0.7));
        assert_eq!(config.url, "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_camel_case_api_key_alias() {
        let config = EndpointConfig::from_value(json!({
            "type": "genta",
            "model": {"name": "demo-model"},
            "apiKey": "secret"
        }))
        .unwrap();
        assert_eq!(config.api_key, "secret");
    }

    fn expect_validation_error(params: Value, field: &str) {
        match EndpointConfig::from_value(params) {
            Err(GentaError::Validation { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation error on `{field}`, got {other:?}"),
        }
    }

    #[test]
    fn test_weight_must_be_positive() {
        let mut params = minimal_params();
        params["weight"] = json!(0);
        expect_validation_error(params.clone(), "weight");

        params["weight"] = json!(-2);
        expect_validation_error(params, "weight");
    }

    #[test]
    fn test_weight_must_be_an_integer() {
        let mut params = minimal_params();
        params["weight"] = json!(1.5);
        expect_validation_error(params.clone(), "weight");

        params["weight"] = json!("2");
        expect_validation_error(params, "weight");
    }

    #[test]
    fn test_kind_discriminator_is_checked() {
        let mut params = minimal_params();
        params["type"] = json!("openai");
        expect_validation_error(params, "type");

        expect_validation_error(
            json!({"model": {"name": "demo"}, "api_key": "secret"}),
            "type",
        );
    }

    #[test]
    fn test_model_is_required() {
        expect_validation_error(json!({"type": "genta", "api_key": "secret"}), "model");
        expect_validation_error(
            json!({"type": "genta", "model": {"name": ""}, "api_key": "secret"}),
            "model",
        );
    }

    #[test]
    fn test_api_key_must_be_a_string() {
        let mut params = minimal_params();
        params["api_key"] = json!(12345);
        expect_validation_error(params, "api_key");
    }

    #[test]
    fn test_url_must_be_a_non_empty_string() {
        let mut params = minimal_params();
        params["url"] = json!("");
        expect_validation_error(params.clone(), "url");

        params["url"] = json!(42);
        expect_validation_error(params, "url");
    }

    // Owns the env var; every other test supplies api_key explicitly so it
    // never reads the environment.
    #[test]
    fn test_api_key_env_fallback() {
        let params = json!({"type": "genta", "model": {"name": "demo-model"}});

        std::env::set_var(API_KEY_ENV, "env-secret");
        let config = EndpointConfig::from_value(params.clone()).unwrap();
        assert_eq!(config.api_key, "env-secret");

        std::env::remove_var(API_KEY_ENV);
        expect_validation_error(params, "api_key");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, minimal_params().to_string()).unwrap();

        let config = EndpointConfig::from_file(&path).unwrap();
        assert_eq!(config.model.name, "demo-model");
    }

    #[test]
    fn test_from_file_reports_path_on_bad_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        match EndpointConfig::from_file(&path) {
            Err(GentaError::ConfigParse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            EndpointConfig::from_file(&path),
            Err(GentaError::ConfigParse { .. })
        ));
    }
}
