//! Cross-cutting error types for Kingyo.
//!
//! Transport, auth and cache failures have their own error enums in their
//! crates; `kingyo-client` converges them into `ClientError`.

use thiserror::Error;

/// Errors that can be raised by any Kingyo crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known enum variant.
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Data failed validation before it was sent to the server.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading a local file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
