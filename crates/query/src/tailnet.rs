use std::net::Ipv4Addr;

use tailscout_localapi::LocalApiClient;
use tailscout_protocol::{NodeStatus, Status};

use crate::QueryError;

/// Handle for asking questions about the local tailnet.
///
/// Wraps a [`LocalApiClient`]; every operation fetches one fresh
/// snapshot and answers from it. The handle itself is stateless, so
/// concurrent callers may share one freely.
pub struct Tailnet {
    client: LocalApiClient,
}

impl Tailnet {
    /// Creates a handle on the platform-default daemon socket.
    pub fn new() -> Self {
        Self {
            client: LocalApiClient::new(),
        }
    }

    /// Creates a handle on a custom client (alternate socket or deadline).
    pub fn with_client(client: LocalApiClient) -> Self {
        Self { client }
    }

    /// Returns the underlying LocalAPI client.
    pub fn client(&self) -> &LocalApiClient {
        &self.client
    }

    /// Fetches a raw status snapshot.
    pub async fn status(&self) -> Result<Status, QueryError> {
        Ok(self.client.status().await?)
    }

    /// First IPv4 address of the local node, in address-list order.
    ///
    /// Fails with [`QueryError::NoIpv4`] when the list holds no IPv4
    /// entry (an IPv6-only node).
    pub async fn self_ipv4(&self) -> Result<Ipv4Addr, QueryError> {
        let status = self.client.status().await?;
        status.self_node.first_ipv4().ok_or(QueryError::NoIpv4)
    }

    /// DNS names (trailing dot trimmed) of peers whose name starts
    /// with `prefix`, in snapshot order.
    ///
    /// With `only_online`, peers flagged offline are excluded. Zero
    /// matches is an empty vector, not an error.
    pub async fn peer_dns_names(
        &self,
        prefix: &str,
        only_online: bool,
    ) -> Result<Vec<String>, QueryError> {
        let status = self.client.status().await?;
        let names = dns_names(&status, prefix, only_online);
        tracing::debug!(prefix, only_online, matches = names.len(), "peer name lookup");
        Ok(names)
    }

    /// IPv4 addresses of peers whose name starts with `prefix`, in
    /// snapshot order; each matching peer contributes all of its IPv4
    /// addresses in address-list order.
    ///
    /// With `only_online`, peers flagged offline are excluded. Zero
    /// matches is an empty vector, not an error.
    pub async fn peer_ipv4s(
        &self,
        prefix: &str,
        only_online: bool,
    ) -> Result<Vec<Ipv4Addr>, QueryError> {
        let status = self.client.status().await?;
        let ips = ipv4s(&status, prefix, only_online);
        tracing::debug!(prefix, only_online, matches = ips.len(), "peer address lookup");
        Ok(ips)
    }
}

impl Default for Tailnet {
    fn default() -> Self {
        Self::new()
    }
}

fn matching_peers<'a>(
    status: &'a Status,
    prefix: &'a str,
    only_online: bool,
) -> impl Iterator<Item = &'a NodeStatus> {
    status
        .peers()
        .filter(move |peer| peer.has_dns_prefix(prefix) && (!only_online || peer.online))
}

fn dns_names(status: &Status, prefix: &str, only_online: bool) -> Vec<String> {
    matching_peers(status, prefix, only_online)
        .map(|peer| peer.trimmed_dns_name().to_string())
        .collect()
}

fn ipv4s(status: &Status, prefix: &str, only_online: bool) -> Vec<Ipv4Addr> {
    matching_peers(status, prefix, only_online)
        .flat_map(|peer| peer.ipv4s())
        .collect()
}
