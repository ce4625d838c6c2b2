//! Centralized error types for neotax.

use thiserror::Error;

/// Main error type for taxonomy loading and lineage lookups.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Invalid rank '{0}': a rank needs an uppercase letter to build its prefix")]
    InvalidRankSpec(String),

    #[error("No lineage found for {0}")]
    NoLineageFound(i64),

    #[error("Node already exists: tax_id {0}")]
    DuplicateNode(i64),

    #[error("Malformed record in {file} at line {line}: {reason}")]
    MalformedRecord {
        file: &'static str,
        line: usize,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

impl TaxonomyError {
    /// Create a not connected error.
    pub fn not_connected(msg: impl Into<String>) -> Self {
        Self::NotConnected(msg.into())
    }

    /// Create a malformed record error.
    pub fn malformed(file: &'static str, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            file,
            line,
            reason: reason.into(),
        }
    }
}
