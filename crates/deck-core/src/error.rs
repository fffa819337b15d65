//! Typed error definitions for backend fetches.
//!
//! Provides [`FetchError`] for the three failure classes a source cell can
//! surface. All variants implement `std::error::Error` via `thiserror`, so
//! they integrate with `anyhow::Result` at the binary boundary.

use thiserror::Error;

/// Why a backend request failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, TCP, TLS, timeout). The request never
    /// produced an HTTP response.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status. `message` carries the
    /// backend's `detail` field when the error body provides one, otherwise
    /// the status reason phrase.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A success response whose body did not decode into the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl FetchError {
    /// The HTTP status code, for [`FetchError::Http`] only.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
