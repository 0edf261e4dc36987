//! Protocol error types.

use gg_schema_core::{CodecError, SchemaError};
use thiserror::Error;

/// Errors raised while encoding, decoding, or interpreting messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Received tag outside the direction's closed set.
    ///
    /// Never coerced to a default message; the receiver decides whether
    /// to drop the message or close the connection, but the error is
    /// always surfaced.
    #[error("Unknown message tag {tag}")]
    UnknownMessage { tag: u32 },

    /// Envelope without a numeric `tag`
    #[error("Message envelope is missing a numeric 'tag'")]
    MissingTag,

    /// Frame is not valid JSON
    #[error("Malformed message frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Body failed descriptor-driven decode
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Schema lookup or instance access failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Decoded log-level ordinal with no typed counterpart
    #[error("Log level ordinal {ordinal} has no typed counterpart")]
    InvalidLogLevel { ordinal: u32 },
}
