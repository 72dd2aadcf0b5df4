//! Conversation message types
//!
//! The normalized message shape the application hands to an endpoint: a
//! speaker role and plain text content. Endpoints map these to their own
//! wire format; the types here stay provider-agnostic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation
///
/// The speaker field is named `from` to match the application's message
/// records; the endpoint renames it to `role` when building a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub from: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl Message {
    /// Create a new user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            from: Role::User,
            content: content.into(),
            id: Some(Uuid::new_v4()),
        }
    }

    /// Create a new assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            from: Role::Assistant,
            content: content.into(),
            id: Some(Uuid::new_v4()),
        }
    }

    /// Create a new system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            from: Role::System,
            content: content.into(),
            id: None,
        }
    }
}
