//! Genta chat-completion endpoint
//!
//! Adapts the Genta text-generation API to the [`Endpoint`] interface.
//! The upstream streams the reply as plain text: each transport chunk is a
//! literal fragment of the message, with no SSE or line framing to parse.
//! Chunk boundaries are transport-determined, so decoding carries split
//! UTF-8 sequences across chunks.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use crate::{
    config::EndpointConfig,
    error::{GentaError, Result},
    messages::{Message, Role},
    services::{
        streaming::{TextChunkDecoder, TokenEvent},
        Endpoint, GenerationRequest, TokenStream,
    },
};

/// Genta API endpoint
pub struct GentaEndpoint {
    client: Client,
    config: EndpointConfig,
}

impl GentaEndpoint {
    /// Create a new Genta endpoint from a validated config
    ///
    /// # Errors
    ///
    /// Returns a validation error when the API key cannot be used as an
    /// HTTP header value.
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                // The upstream expects the bare key, no "Bearer " prefix.
                headers.insert(
                    header::AUTHORIZATION,
                    header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                        GentaError::Validation {
                            field: "api_key".to_string(),
                            message: "not a valid header value".to_string(),
                        }
                    })?,
                );
                headers
            })
            .build()?;

        Ok(Self { client, config })
    }

    /// Format the conversation for the request body
    ///
    /// Prepends a system message built from the preprompt when the
    /// conversation does not start with one, then strips every system
    /// message when the model does not accept them.
    fn format_messages(&self, messages: &[Message], preprompt: Option<&str>) -> Vec<ChatMessage> {
        let mut formatted: Vec<ChatMessage> = messages
            .iter()
            .map(|message| ChatMessage {
                role: message.from,
                content: message.content.clone(),
            })
            .collect();

        if formatted.first().map(|first| first.role) != Some(Role::System) {
            formatted.insert(
                0,
                ChatMessage {
                    role: Role::System,
                    content: preprompt.unwrap_or_default().to_string(),
                },
            );
        }

        if !self.config.model.accepts_system_prompt() {
            formatted.retain(|message| message.role != Role::System);
        }

        formatted
    }

    /// Build the request body for one invocation
    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let merged = request.settings.merged_over(&self.config.model.parameters);

        ChatCompletionRequest {
            model: self.config.model.request_model().to_string(),
            messages: self.format_messages(&request.messages, request.preprompt.as_deref()),
            stream: true,
            temperature: merged.temperature,
            top_p: merged.top_p,
            max_tokens: merged.max_new_tokens,
        }
    }

    /// Map the response byte stream into token events
    ///
    /// The byte stream (and with it the connection) is owned by the
    /// returned stream, so dropping it mid-generation releases the
    /// transport. A transport or decode error ends the sequence without a
    /// terminal event.
    fn token_stream(
        byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    ) -> impl Stream<Item = Result<TokenEvent>> + Send + 'static {
        async_stream::stream! {
            let mut byte_stream = Box::pin(byte_stream);
            let mut decoder = TextChunkDecoder::new();
            let mut generated_text = String::new();
            let mut token_id: u64 = 0;

            while let Some(chunk) = byte_stream.next().await {
                let text = match chunk {
                    Ok(bytes) => match decoder.decode(&bytes) {
                        Ok(text) => text,
                        Err(err) => {
                            yield Err(err);
                            return;
                        }
                    },
                    Err(err) => {
                        yield Err(err.into());
                        return;
                    }
                };

                // A chunk holding only part of a multi-byte sequence
                // decodes to nothing; it is not a token.
                if text.is_empty() {
                    continue;
                }

                generated_text.push_str(&text);
                yield Ok(TokenEvent::fragment(token_id, text, generated_text.clone()));
                token_id += 1;
            }

            if let Err(err) = decoder.finish() {
                yield Err(err);
                return;
            }

            yield Ok(TokenEvent::terminal(token_id));
        }
    }
}

#[async_trait]
impl Endpoint for GentaEndpoint {
    fn kind(&self) -> &str {
        self.config.kind.as_str()
    }

    fn model(&self) -> &str {
        self.config.model.request_model()
    }

    async fn stream_generate(&self, request: GenerationRequest) -> Result<TokenStream> {
        let body = self.build_request(&request);

        debug!("conversation for {}:", body.model);
        for message in &body.messages {
            debug!("{}: {}", message.role.as_str(), message.content);
        }

        let response = self.client.post(&self.config.url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(GentaError::Upstream { status, body });
        }

        Ok(Box::pin(Self::token_stream(response.bytes_stream())))
    }
}

// Genta wire types

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ChatMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}
