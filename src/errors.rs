//! Error types for the certificate hierarchy generator.
//!
//! Every kind here is fatal: the process aborts with a descriptive message
//! and a non-zero exit code, nothing is retried, and partially written files
//! are left on disk. Re-running with the same parameters resumes from
//! whatever tier is already present.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while resolving domain layouts and generating
/// certificate material
#[derive(Debug, Error)]
pub enum PkiError {
    /// The parent domain lacks a complete Root/Intermediate key-and-certificate
    /// set. Partial parent state is never repaired from a child invocation.
    #[error("parent domain '{domain}' has no usable CA material: {detail}")]
    MissingParentCA { domain: String, detail: String },

    /// Host certificate issuance was requested without a usable Intermediate CA.
    #[error("no usable Intermediate CA under '{}'", .0.display())]
    MissingIntermediateCA(PathBuf),

    /// Non-interactive mode requires a hostname but none was supplied.
    #[error("a hostname is required in non-interactive mode")]
    MissingHostname,

    /// The underlying cryptographic operation failed.
    #[error("signing operation failed: {0}")]
    SigningFailure(String),

    /// Directory or file creation failed.
    #[error("filesystem operation on '{}' failed: {source}", .path.display())]
    FileSystemError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PkiError {
    /// Wrap an I/O error with the path it occurred on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystemError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PkiError>;
