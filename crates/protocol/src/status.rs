use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of the daemon's view of the tailnet.
///
/// Peers are keyed by node public key, exactly as the daemon
/// serializes them. Iteration order is the key order; nothing
/// downstream re-sorts results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    /// Daemon version string.
    #[serde(default)]
    pub version: String,

    /// Backend state: `"Running"`, `"Stopped"`, `"NeedsLogin"`, ...
    #[serde(default)]
    pub backend_state: String,

    /// Local addresses as reported at the top level, daemon order.
    #[serde(rename = "TailscaleIPs", default)]
    pub tailscale_ips: Vec<IpAddr>,

    /// MagicDNS suffix of the tailnet, without trailing dot.
    #[serde(rename = "MagicDNSSuffix", default)]
    pub magic_dns_suffix: String,

    /// The local node.
    #[serde(rename = "Self", default)]
    pub self_node: NodeStatus,

    /// All other nodes visible in the tailnet, keyed by public key.
    #[serde(default)]
    pub peer: BTreeMap<String, NodeStatus>,
}

impl Status {
    /// Iterates over peers in snapshot order.
    pub fn peers(&self) -> impl Iterator<Item = &NodeStatus> {
        self.peer.values()
    }

    /// Number of peers currently flagged online.
    pub fn online_peer_count(&self) -> usize {
        self.peers().filter(|p| p.online).count()
    }

    /// Returns true once the daemon is up and connected to the tailnet.
    pub fn is_running(&self) -> bool {
        self.backend_state == "Running"
    }
}

/// One node as seen in a snapshot. The daemon uses the same shape for
/// the local node and for peers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeStatus {
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(default)]
    pub public_key: String,

    #[serde(default)]
    pub host_name: String,

    /// MagicDNS name, usually with a trailing dot (`"host.tail.ts.net."`).
    #[serde(rename = "DNSName", default)]
    pub dns_name: String,

    #[serde(rename = "OS", default)]
    pub os: String,

    /// Addresses assigned to the node, mixed IPv4/IPv6, daemon order.
    #[serde(rename = "TailscaleIPs", default)]
    pub tailscale_ips: Vec<IpAddr>,

    #[serde(default)]
    pub online: bool,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub exit_node: bool,

    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl NodeStatus {
    /// DNS name with at most one trailing dot removed.
    pub fn trimmed_dns_name(&self) -> &str {
        self.dns_name.strip_suffix('.').unwrap_or(&self.dns_name)
    }

    /// Case-sensitive prefix test against the trimmed DNS name.
    pub fn has_dns_prefix(&self, prefix: &str) -> bool {
        self.trimmed_dns_name().starts_with(prefix)
    }

    /// First IPv4 address in the node's address list, in list order.
    pub fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.tailscale_ips.iter().find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
    }

    /// Every IPv4 address in the node's address list, in list order.
    pub fn ipv4s(&self) -> Vec<Ipv4Addr> {
        self.tailscale_ips
            .iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(_) => None,
            })
            .collect()
    }
}
