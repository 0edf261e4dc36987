//! `.gguser` file store: atomic save, tolerant load.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gg_schema_core::{codec, SchemaRegistry};

use crate::error::ProjectError;
use crate::schema;
use crate::user_file::UserFile;

/// File extension of persisted project documents.
pub const GG_USER_EXT: &str = "gguser";

/// Document versions this build reads without fallback warnings.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Loads and saves project documents under one directory.
pub struct ProjectStore {
    dir: PathBuf,
    registry: Arc<SchemaRegistry>,
}

impl ProjectStore {
    /// Creates a store rooted at `dir` using the given schema registry.
    pub fn new(dir: impl Into<PathBuf>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            dir: dir.into(),
            registry,
        }
    }

    /// Absolute path a document name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension(GG_USER_EXT)
        }
    }

    /// Saves a document, replacing any previous file atomically.
    ///
    /// Writes to a temporary sibling, syncs, then renames over the final
    /// path so readers never observe a half-written document.
    pub fn save(&self, file: &UserFile, name: &str) -> Result<PathBuf, ProjectError> {
        let final_path = self.path_for(name);
        let temp_path = final_path.with_extension(format!("{GG_USER_EXT}.tmp"));

        let doc = codec::encode(file.root())?;
        let text = serde_json::to_string_pretty(&doc)?;

        fs::create_dir_all(&self.dir).map_err(|source| ProjectError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut out = File::create(&temp_path).map_err(|source| ProjectError::Io {
            path: temp_path.clone(),
            source,
        })?;
        out.write_all(text.as_bytes())
            .and_then(|_| out.sync_all())
            .map_err(|source| ProjectError::Io {
                path: temp_path.clone(),
                source,
            })?;

        fs::rename(&temp_path, &final_path).map_err(|source| ProjectError::Io {
            path: final_path.clone(),
            source,
        })?;

        Ok(final_path)
    }

    /// Loads a document by name.
    ///
    /// Decoding is tolerant by contract: unknown fields are ignored and
    /// missing or renamed fields fall back to their descriptor defaults.
    /// A document from an incompatible future major version is rejected;
    /// any other unrecognized version logs a warning and proceeds
    /// best-effort.
    pub fn load(&self, name: &str) -> Result<UserFile, ProjectError> {
        let path = self.path_for(name);
        let text = fs::read_to_string(&path).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;
        let doc: serde_json::Value = serde_json::from_str(&text)?;

        check_version(&path, &doc)?;

        let root = codec::decode(&self.registry, schema::GG_USER_FILE, &doc)?;
        Ok(UserFile::from_root(self.registry.clone(), root))
    }
}

fn check_version(path: &Path, doc: &serde_json::Value) -> Result<(), ProjectError> {
    let Some(version) = doc.get("version").and_then(|v| v.as_str()) else {
        tracing::warn!(path = %path.display(), "project document has no version field, assuming current");
        return Ok(());
    };
    if SUPPORTED_VERSIONS.contains(&version) {
        return Ok(());
    }
    let major = version.split('.').next().unwrap_or("");
    let supported_major = SUPPORTED_VERSIONS[0].split('.').next().unwrap_or("");
    if major != supported_major {
        return Err(ProjectError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: version.to_string(),
        });
    }
    tracing::warn!(
        path = %path.display(),
        version,
        "unrecognized project version, loading best-effort"
    );
    Ok(())
}
