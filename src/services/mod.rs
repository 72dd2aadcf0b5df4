//! Service layer: the common streaming interface for generation endpoints
//!
//! An [`Endpoint`] adapts one upstream text-generation API to a uniform
//! contract: take a normalized conversation plus generation settings,
//! return a lazy stream of [`TokenEvent`]s. The registry that picks an
//! endpoint for a given model lives in the embedding application; this
//! crate ships the Genta adapter and a factory building it from a
//! validated config.

pub mod genta;
pub mod streaming;

pub use genta::GentaEndpoint;
pub use streaming::{StreamDetails, Token, TokenEvent};

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    config::{EndpointConfig, EndpointKind, GenerationSettings},
    error::Result,
    messages::Message,
};

/// One generation request handed to an endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Ordered conversation so far
    pub messages: Vec<Message>,

    /// System preamble, synthesized into a leading system message when the
    /// conversation does not start with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprompt: Option<String>,

    /// Caller generation settings, merged over the model's defaults
    #[serde(default)]
    pub settings: GenerationSettings,
}

/// Lazy sequence of token events produced by one invocation
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<TokenEvent>> + Send>>;

/// Core trait for generation endpoints
///
/// Implementations hold no per-invocation state; concurrent calls on one
/// endpoint are independent.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Endpoint kind tag (e.g. "genta")
    fn kind(&self) -> &str;

    /// Model identifier sent upstream
    fn model(&self) -> &str;

    /// Start one streaming generation
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be dispatched or the upstream rejects
    /// it; errors after the stream starts surface as stream items instead.
    async fn stream_generate(&self, request: GenerationRequest) -> Result<TokenStream>;
}

/// Build the endpoint for a validated configuration
///
/// # Errors
///
/// Returns an error when the underlying HTTP client cannot be constructed
/// (e.g. the API key is not a valid header value).
pub fn endpoint_from_config(config: EndpointConfig) -> Result<Box<dyn Endpoint>> {
    match config.kind {
        EndpointKind::Genta => Ok(Box::new(GentaEndpoint::new(config)?)),
    }
}

/// Drain a token stream and return the final generated text
///
/// # Errors
///
/// Propagates the first stream error; fragments consumed before the error
/// are discarded.
pub async fn collect_text(mut stream: TokenStream) -> Result<String> {
    let mut text = String::new();
    while let Some(event) = stream.next().await {
        let event = event?;
        if !event.is_terminal() {
            text.push_str(&event.token.text);
        }
    }
    Ok(text)
}
