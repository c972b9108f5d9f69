//! End-to-end tests against a fake daemon on a tempdir Unix socket.

#![cfg(unix)]

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;

use tailscout::{LocalApiClient, LocalApiError, QueryError, Tailnet};

const SNAPSHOT: &str = r#"{
    "Version": "1.66.4",
    "BackendState": "Running",
    "TailscaleIPs": ["100.64.0.1", "fd7a:115c:a1e0::1"],
    "MagicDNSSuffix": "tail.ts.net",
    "Self": {
        "ID": "nSELF",
        "HostName": "me",
        "DNSName": "me.tail.ts.net.",
        "OS": "linux",
        "TailscaleIPs": ["fd7a:115c:a1e0::1", "100.64.0.1"],
        "Online": true
    },
    "Peer": {
        "nodekey:aa": {
            "ID": "n1",
            "HostName": "metrics-grafana-1",
            "DNSName": "metrics-grafana-1.tail.ts.net.",
            "OS": "linux",
            "TailscaleIPs": ["10.0.0.1"],
            "Online": true
        },
        "nodekey:bb": {
            "ID": "n2",
            "HostName": "metrics-grafana-2",
            "DNSName": "metrics-grafana-2.tail.ts.net.",
            "OS": "linux",
            "TailscaleIPs": ["10.0.0.2"],
            "Online": false
        },
        "nodekey:cc": {
            "ID": "n3",
            "HostName": "nas",
            "DNSName": "nas.tail.ts.net.",
            "OS": "linux",
            "TailscaleIPs": ["10.0.0.3", "fd7a:115c:a1e0::3"],
            "Online": true
        }
    }
}"#;

/// Serves `body` as one HTTP response per accepted connection.
fn spawn_daemon(path: &Path, body: &'static str) -> tokio::task::JoinHandle<()> {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.0 200 OK\r\nContent-Type: application/json\r\n\r\n{body}"
                );
                let _ = stream.write_all(response.as_bytes()).await;
            });
        }
    })
}

fn tailnet_on(path: &Path) -> Tailnet {
    Tailnet::with_client(LocalApiClient::with_socket(path))
}

#[tokio::test]
async fn self_ipv4_skips_leading_ipv6() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailscaled.sock");
    let daemon = spawn_daemon(&path, SNAPSHOT);

    let ip = tailnet_on(&path).self_ipv4().await.unwrap();
    assert_eq!(ip, "100.64.0.1".parse::<Ipv4Addr>().unwrap());

    daemon.abort();
}

#[tokio::test]
async fn self_ipv4_fails_on_ipv6_only_node() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailscaled.sock");
    let daemon = spawn_daemon(
        &path,
        r#"{"BackendState": "Running", "Self": {"DNSName": "me.tail.ts.net.", "TailscaleIPs": ["2001:db8::1"]}}"#,
    );

    let err = tailnet_on(&path).self_ipv4().await.unwrap_err();
    assert!(matches!(err, QueryError::NoIpv4));

    daemon.abort();
}

#[tokio::test]
async fn peer_lookups_filter_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailscaled.sock");
    let daemon = spawn_daemon(&path, SNAPSHOT);

    let tailnet = tailnet_on(&path);

    let online = tailnet.peer_dns_names("metrics-grafana", true).await.unwrap();
    assert_eq!(online, vec!["metrics-grafana-1.tail.ts.net"]);

    let all = tailnet.peer_dns_names("metrics-grafana", false).await.unwrap();
    assert_eq!(
        all,
        vec![
            "metrics-grafana-1.tail.ts.net",
            "metrics-grafana-2.tail.ts.net"
        ]
    );

    let ips = tailnet.peer_ipv4s("metrics-grafana", false).await.unwrap();
    assert_eq!(
        ips,
        vec![
            "10.0.0.1".parse::<Ipv4Addr>().unwrap(),
            "10.0.0.2".parse::<Ipv4Addr>().unwrap()
        ]
    );

    // Mixed address list never leaks IPv6.
    let nas = tailnet.peer_ipv4s("nas", true).await.unwrap();
    assert_eq!(nas, vec!["10.0.0.3".parse::<Ipv4Addr>().unwrap()]);

    let none = tailnet.peer_dns_names("absent", false).await.unwrap();
    assert!(none.is_empty());

    daemon.abort();
}

#[tokio::test]
async fn all_operations_surface_upstream_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailscaled.sock");

    // Accepts connections but never answers.
    let listener = UnixListener::bind(&path).unwrap();
    let daemon = tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            held.push(stream);
        }
    });

    let mut client = LocalApiClient::with_socket(&path);
    client.set_timeout(Duration::from_millis(100));
    let tailnet = Tailnet::with_client(client);

    for err in [
        tailnet.self_ipv4().await.map(|_| ()).unwrap_err(),
        tailnet
            .peer_dns_names("x", false)
            .await
            .map(|_| ())
            .unwrap_err(),
        tailnet.peer_ipv4s("x", false).await.map(|_| ()).unwrap_err(),
    ] {
        assert!(matches!(
            err,
            QueryError::Upstream(LocalApiError::Timeout { .. })
        ));
    }

    daemon.abort();
}

#[tokio::test]
async fn operations_surface_connect_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sock");

    let err = tailnet_on(&path).self_ipv4().await.unwrap_err();
    assert!(matches!(err, QueryError::Upstream(LocalApiError::Io(_))));
}
