//! Wire types for the tailscaled status snapshot.
//!
//! The daemon reports its view of the tailnet as a JSON document with
//! PascalCase keys. This crate models the subset the rest of the
//! workspace consumes, plus the pure derivations on it (first-IPv4
//! lookup, DNS-name prefix matching).

pub mod status;

// Re-export primary types.
pub use status::{NodeStatus, Status};
