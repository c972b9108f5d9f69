use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Query the local tailscaled for addresses and peers
#[derive(Parser, Debug)]
#[command(name = "tailscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Alternate LocalAPI socket path
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Request deadline in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the local node's first IPv4 address
    Ip,

    /// List peers whose DNS name starts with PREFIX
    Peers {
        #[arg(value_name = "PREFIX")]
        prefix: String,

        /// Only include peers currently online
        #[arg(long, default_value = "false")]
        online: bool,

        /// Print IPv4 addresses instead of DNS names
        #[arg(long, default_value = "false")]
        ips: bool,
    },

    /// Show a summary of the daemon's status
    Status,
}
