//! Project-state model for the preview tool.
//!
//! Registers the `.gguser` descriptor tables, wraps the root document in
//! a typed facade, and persists documents with atomic writes and
//! tolerant, default-filling reads.

pub mod error;
pub mod schema;
pub mod store;
pub mod user_file;

pub use error::ProjectError;
pub use schema::{project_registry, register_project};
pub use store::{ProjectStore, GG_USER_EXT, SUPPORTED_VERSIONS};
pub use user_file::UserFile;
