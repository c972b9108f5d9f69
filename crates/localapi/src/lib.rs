//! LocalAPI transport for tailscaled.
//!
//! The daemon serves a small HTTP API over a Unix domain socket. This
//! crate speaks just enough of it to fetch the status snapshot, with
//! every request bounded by a per-call deadline.

pub mod client;

// Re-export primary types.
pub use client::{DEFAULT_SOCKET, DEFAULT_TIMEOUT, LocalApiClient};

/// Errors for LocalAPI requests.
#[derive(Debug, thiserror::Error)]
pub enum LocalApiError {
    #[error("I/O error talking to tailscaled: {0}")]
    Io(#[from] std::io::Error),

    #[error("status request timed out after {after:?}")]
    Timeout { after: std::time::Duration },

    #[error("LocalAPI returned HTTP {status}")]
    Http { status: u16 },

    #[error("malformed LocalAPI response: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no LocalAPI transport on this platform")]
    Unsupported,
}
