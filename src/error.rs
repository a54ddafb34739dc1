//! Error types for model loading and construction.
//!
//! Synthesis itself never fails: a bad value degrades to an omitted or
//! default directive. Errors only surface where a snapshot enters the
//! crate (file loading, validation) and where a protocol tag is parsed.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors raised while loading a routing model snapshot.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Snapshot file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML snapshot failed to deserialize.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON snapshot failed to deserialize.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.toml` nor `.json`.
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Snapshot parsed but failed semantic checks.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unknown backend protocol tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend protocol: {0}")]
pub struct ProtocolError(pub String);
