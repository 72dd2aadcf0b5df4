//! Incremental UTF-8 chunk decoding
//!
//! The Genta stream is plain text with transport-determined chunk
//! boundaries, so a multi-byte sequence can be split across two chunks.
//! The decoder carries the incomplete tail over to the next chunk instead
//! of treating it as invalid.

use crate::error::{GentaError, Result};

/// Streaming decoder turning byte chunks into text
#[derive(Debug, Default)]
pub struct TextChunkDecoder {
    /// Incomplete trailing sequence held back from the previous chunk
    pending: Vec<u8>,
}

impl TextChunkDecoder {
    /// Create a new decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk
    ///
    /// Returns the decoded text, which may be empty when the chunk only
    /// extends an incomplete sequence.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the stream contains bytes that are not
    /// valid UTF-8 (as opposed to merely incomplete at the chunk boundary).
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let valid_len = match std::str::from_utf8(&bytes) {
            Ok(_) => bytes.len(),
            // error_len() of None marks an incomplete trailing sequence
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => {
                return Err(GentaError::Decode(format!(
                    "invalid UTF-8 in stream at byte {}",
                    err.valid_up_to()
                )));
            }
        };

        self.pending = bytes.split_off(valid_len);
        String::from_utf8(bytes).map_err(|err| GentaError::Decode(err.to_string()))
    }

    /// Signal end-of-stream
    ///
    /// # Errors
    ///
    /// Returns a decode error when the stream ended in the middle of a
    /// multi-byte sequence.
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(GentaError::Decode(format!(
                "stream ended mid UTF-8 sequence ({} byte(s) pending)",
                self.pending.len()
            )))
        }
    }
}
