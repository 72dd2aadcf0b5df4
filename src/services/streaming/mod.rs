//! Streaming token events
//!
//! The internal schema an endpoint emits while a generation streams: one
//! [`TokenEvent`] per text fragment, closed by a single terminal event.
//! Consumers rely on `generated_text` and `details` serializing as explicit
//! nulls on the terminal event, so no field is skipped when absent.

pub mod text_decoder;

pub use text_decoder::TextChunkDecoder;

use serde::{Deserialize, Serialize};

/// A single generation token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Monotonically increasing id, starting at 0 per invocation
    pub id: u64,

    /// Emitted text fragment; empty on the terminal event
    pub text: String,

    /// Placeholder; this transport reports no log-probabilities
    pub logprobs: f64,

    /// True only on the terminal event
    pub special: bool,
}

/// Fine-grained finish data
///
/// Part of the schema for parity with richer transports; the Genta stream
/// carries no stop-reason data, so endpoints here never populate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDetails {
    pub finish_reason: String,
    pub generated_tokens: u64,
}

/// One event in the lazy generation sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEvent {
    pub token: Token,

    /// Running text accumulated so far; `None` on the terminal event
    pub generated_text: Option<String>,

    pub details: Option<StreamDetails>,
}

impl TokenEvent {
    /// Build a non-terminal event carrying one text fragment
    #[must_use]
    pub fn fragment(id: u64, text: impl Into<String>, generated_text: impl Into<String>) -> Self {
        Self {
            token: Token {
                id,
                text: text.into(),
                logprobs: 0.0,
                special: false,
            },
            generated_text: Some(generated_text.into()),
            details: None,
        }
    }

    /// Build the terminal event closing the sequence
    #[must_use]
    pub fn terminal(id: u64) -> Self {
        Self {
            token: Token {
                id,
                text: String::new(),
                logprobs: 0.0,
                special: true,
            },
            generated_text: None,
            details: None,
        }
    }

    /// True for the event that closes the sequence
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.token.special
    }
}
