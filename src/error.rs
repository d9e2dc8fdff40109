//! Error types for the CMCI client and CLI.

use thiserror::Error;

/// Errors surfaced by the CMCI request pipeline and the CLI layer.
///
/// Validation failures are raised before any network activity; transport and
/// response failures propagate from the dispatcher unchanged. Nothing here is
/// retried — every failure is reported exactly once.
#[derive(Debug, Error)]
pub enum CmciError {
    /// A required parameter was missing or blank. Detected by the validator
    /// before a request is built.
    #[error("CICS {resource} {field} is required")]
    MissingParameter {
        resource: &'static str,
        field: &'static str,
    },

    /// The HTTP round trip failed (connection, timeout, non-2xx status).
    #[error("CMCI request failed: {0}")]
    Transport(String),

    /// The server answered, but the body could not be parsed as CMCI XML.
    #[error("Failed to parse CMCI response: {0}")]
    Response(String),

    /// The server answered with a non-OK result summary.
    #[error("CMCI request rejected: {reason} (api_response1={code})")]
    Rejected { code: u32, reason: String },

    /// Connection profile could not be loaded, saved, or found.
    #[error("Profile error: {0}")]
    Profile(String),

    /// Invalid configuration (logging setup, malformed profile content).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmciError {
    /// True for errors the caller can fix by correcting input, i.e. the
    /// validation category.
    pub fn is_validation(&self) -> bool {
        matches!(self, CmciError::MissingParameter { .. })
    }
}
