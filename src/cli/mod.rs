//! CLI argument parsing

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use crate::{
    config::{default_config_path, EndpointConfig, GenerationSettings},
    error::{GentaError, Result},
};

/// Genta: stream chat completions from the Genta API
#[derive(Debug, Parser)]
#[command(name = "genta")]
#[command(about = "Stream chat completions from the Genta API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The user message to send
    pub prompt: String,

    /// Path to an endpoint config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model name; required unless a config file provides one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Upstream model identifier, when it differs from the name
    #[arg(long)]
    pub model_id: Option<String>,

    /// API key for the Genta API
    #[arg(long, env = "GENTA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// System prompt to prepend to the conversation
    #[arg(short, long)]
    pub preprompt: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling cutoff
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_new_tokens: Option<u32>,

    /// Print the full reply once instead of streaming fragments
    #[arg(long)]
    pub collect: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the endpoint config
    ///
    /// An explicit `--config` file wins, then the default config path when
    /// a file exists there, then the model flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file cannot be read or when the
    /// resolved parameters fail validation.
    pub fn endpoint_config(&self) -> Result<EndpointConfig> {
        if let Some(path) = &self.config {
            return EndpointConfig::from_file(path);
        }

        let default_path = default_config_path();
        if default_path.exists() {
            return EndpointConfig::from_file(&default_path);
        }

        self.endpoint_from_flags()
    }

    /// Generation settings from the sampling flags
    ///
    /// These are caller overrides; the endpoint merges them over the
    /// model-level defaults.
    #[must_use]
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            top_p: self.top_p,
            max_new_tokens: self.max_new_tokens,
            ..GenerationSettings::default()
        }
    }

    fn endpoint_from_flags(&self) -> Result<EndpointConfig> {
        let Some(model) = &self.model else {
            return Err(GentaError::Validation {
                field: "model".to_string(),
                message: "required when no config file is given".to_string(),
            });
        };

        let mut model_value = json!({ "name": model });
        if let Some(id) = &self.model_id {
            model_value["id"] = json!(id);
        }

        let mut params = json!({ "type": "genta", "model": model_value });
        if let Some(key) = &self.api_key {
            params["apiKey"] = json!(key);
        }

        EndpointConfig::from_value(params)
    }
}
