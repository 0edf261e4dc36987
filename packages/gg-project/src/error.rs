//! Project file errors.

use std::path::PathBuf;

use gg_schema_core::{CodecError, SchemaError};
use thiserror::Error;

/// Errors raised while loading or saving project documents.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Filesystem failure with the path involved
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON
    #[error("Malformed project document: {0}")]
    Json(#[from] serde_json::Error),

    /// Document failed descriptor-driven decode
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Schema lookup or instance access failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Document declares an incompatible future format
    #[error("Project '{path}' declares unsupported version '{found}'")]
    UnsupportedVersion { path: PathBuf, found: String },
}
