//! tailscout command-line entry point.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use tailscout::{LocalApiClient, Tailnet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut client = match &cli.socket {
        Some(path) => LocalApiClient::with_socket(path),
        None => LocalApiClient::new(),
    };
    if let Some(secs) = cli.timeout {
        client.set_timeout(Duration::from_secs(secs));
    }
    let tailnet = Tailnet::with_client(client);

    match cli.command {
        Commands::Ip => {
            let ip = tailnet
                .self_ipv4()
                .await
                .context("failed to resolve the local node's IPv4 address")?;
            println!("{ip}");
        }
        Commands::Peers {
            prefix,
            online,
            ips,
        } => {
            if ips {
                let addrs = tailnet
                    .peer_ipv4s(&prefix, online)
                    .await
                    .context("peer address lookup failed")?;
                for addr in addrs {
                    println!("{addr}");
                }
            } else {
                let names = tailnet
                    .peer_dns_names(&prefix, online)
                    .await
                    .context("peer name lookup failed")?;
                for name in names {
                    println!("{name}");
                }
            }
        }
        Commands::Status => {
            let status = tailnet
                .status()
                .await
                .context("failed to fetch daemon status")?;
            println!("backend:  {}", status.backend_state);
            println!("self:     {}", status.self_node.trimmed_dns_name());
            match status.self_node.first_ipv4() {
                Some(ip) => println!("ipv4:     {ip}"),
                None => println!("ipv4:     (none)"),
            }
            println!(
                "peers:    {} ({} online)",
                status.peer.len(),
                status.online_peer_count()
            );
        }
    }

    Ok(())
}
