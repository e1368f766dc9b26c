//! Host error types.

use thiserror::Error;

/// Errors that can occur when talking to a remote grade service.
#[derive(Debug, Error)]
pub enum HostError {
    /// The grade service rejected our credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The grade service answered with an error status.
    #[error("grade rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}
