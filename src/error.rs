//! Crate-level error types.
//!
//! Library consumers that do not care about the fine-grained bundler error
//! taxonomy can hold everything as a [`BundleError`].

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Top-level error for library operations.
#[derive(Error, Debug)]
pub enum BundleError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundler errors
    #[error("bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}
