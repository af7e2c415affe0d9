//! Error taxonomy for the extraction-and-load pipeline.

use thiserror::Error;

/// Failures that abort an import.
///
/// Field-level parse problems inside a record never surface here; they
/// degrade to the field's default during extraction.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The library document is not valid JSON.
    #[error("malformed library document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    /// The configured provider selector is not one we can connect to.
    #[error("unsupported database provider: {0}")]
    UnsupportedProvider(String),

    /// A prepared command was executed without a value for one of its parameters.
    #[error("no value bound for parameter :{0}")]
    UnboundParameter(String),

    /// Connection, query or constraint failure reported by the backend.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
