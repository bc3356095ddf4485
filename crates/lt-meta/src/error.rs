//! Error types for metadata loading.

use thiserror::Error;

pub type MetaResult<T> = Result<T, MetaError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetaError {
    /// No manifest at the expected location, or it could not be read.
    #[error("Build manifest unavailable at {path}: {what}")]
    ManifestUnavailable { path: String, what: String },

    /// The manifest exists but is not `Key: Value` lines.
    #[error("Malformed build manifest at line {line}: {what}")]
    ManifestMalformed { line: usize, what: String },

    /// The process-wide instance was installed already.
    #[error("Build info already installed")]
    AlreadyInstalled,
}
