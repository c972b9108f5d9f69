//! Convenience queries over the local tailscaled status snapshot.
//!
//! Answers three questions about the tailnet this host belongs to:
//! the local node's first IPv4 address, and which peers match a
//! DNS-name prefix — as trimmed DNS names or as IPv4 addresses.
//!
//! Each operation fetches one fresh snapshot from the daemon and
//! derives its answer from it; nothing is cached and nothing is
//! retried. Use the top-level functions for the common case (a
//! process-wide handle on the default socket), or [`Tailnet`] with a
//! custom [`LocalApiClient`] for an alternate socket or deadline.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), tailscout::QueryError> {
//! let ip = tailscout::self_ipv4().await?;
//! let graphers = tailscout::peer_dns_names("metrics-grafana", true).await?;
//! # Ok(())
//! # }
//! ```

use std::net::Ipv4Addr;
use std::sync::OnceLock;

pub mod tailnet;

// Re-export primary types.
pub use tailnet::Tailnet;
pub use tailscout_localapi::{LocalApiClient, LocalApiError};
pub use tailscout_protocol::{NodeStatus, Status};

/// Errors for tailnet queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The snapshot fetch failed or timed out; the cause is preserved.
    #[error("status query failed: {0}")]
    Upstream(#[from] LocalApiError),

    /// The local node's address list holds no IPv4 entry.
    #[error("local node has no IPv4 address")]
    NoIpv4,
}

static SHARED: OnceLock<Tailnet> = OnceLock::new();

/// Process-wide [`Tailnet`] handle on the default socket, created on
/// first use and read-only thereafter.
pub fn shared() -> &'static Tailnet {
    SHARED.get_or_init(Tailnet::new)
}

/// First IPv4 address of the local node, via the shared handle.
pub async fn self_ipv4() -> Result<Ipv4Addr, QueryError> {
    shared().self_ipv4().await
}

/// DNS names of peers matching `prefix`, via the shared handle.
pub async fn peer_dns_names(prefix: &str, only_online: bool) -> Result<Vec<String>, QueryError> {
    shared().peer_dns_names(prefix, only_online).await
}

/// IPv4 addresses of peers matching `prefix`, via the shared handle.
pub async fn peer_ipv4s(prefix: &str, only_online: bool) -> Result<Vec<Ipv4Addr>, QueryError> {
    shared().peer_ipv4s(prefix, only_online).await
}
