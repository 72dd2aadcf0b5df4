//! Genta-rs: streaming client for the Genta chat-completion API
//!
//! This library adapts the Genta text-generation API to a token-event
//! stream. A conversation is formatted and posted once; the reply arrives
//! as lazy fragment events closed by a single terminal marker.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod cli;
pub mod config;
pub mod error;
pub mod messages;
pub mod services;

// Re-exports for convenience
pub use error::{GentaError, Result};
pub use messages::{Message, Role};
