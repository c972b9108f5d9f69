use std::path::{Path, PathBuf};
use std::time::Duration;

use tailscout_protocol::Status;
use tokio::time::timeout;

use crate::LocalApiError;

/// Default tailscaled LocalAPI socket path.
#[cfg(target_os = "macos")]
pub const DEFAULT_SOCKET: &str = "/var/run/tailscaled.socket";
/// Default tailscaled LocalAPI socket path.
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_SOCKET: &str = "/var/run/tailscale/tailscaled.sock";

/// Default bound on a single status request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const STATUS_ENDPOINT: &str = "/localapi/v0/status";

/// Client for the tailscaled LocalAPI socket.
///
/// Immutable after construction; `&self` methods are safe to call from
/// concurrent tasks. Each request opens its own connection and is
/// bounded by the configured timeout, so a stalled daemon cannot block
/// a caller indefinitely.
#[derive(Debug, Clone)]
pub struct LocalApiClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl LocalApiClient {
    /// Creates a client for the platform-default socket path.
    pub fn new() -> Self {
        Self::with_socket(DEFAULT_SOCKET)
    }

    /// Creates a client for an alternate socket path.
    pub fn with_socket(path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request deadline.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Returns the socket path this client connects to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Returns the per-request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the current status snapshot from the daemon.
    ///
    /// One request, no retries. The deadline covers connect, write,
    /// read, and parse; on expiry the connection is dropped and the
    /// call fails as a whole.
    pub async fn status(&self) -> Result<Status, LocalApiError> {
        let body = match timeout(self.timeout, self.fetch(STATUS_ENDPOINT)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(LocalApiError::Timeout {
                    after: self.timeout,
                });
            }
        };
        let status: Status = serde_json::from_slice(&body)?;
        tracing::debug!(
            backend_state = %status.backend_state,
            peers = status.peer.len(),
            "status snapshot fetched"
        );
        Ok(status)
    }

    #[cfg(unix)]
    async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>, LocalApiError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::UnixStream;

        tracing::debug!(socket = %self.socket_path.display(), endpoint, "querying LocalAPI");

        let mut stream = UnixStream::connect(&self.socket_path).await?;

        // HTTP/1.0 keeps the daemon from chunking the body; it answers
        // the one request and closes, so the body ends at EOF.
        let request = format!("GET {endpoint} HTTP/1.0\r\nHost: local-tailscaled.sock\r\n\r\n");
        stream.write_all(request.as_bytes()).await?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;

        let (code, body) = parse_response(&response)?;
        if code != 200 {
            return Err(LocalApiError::Http { status: code });
        }
        Ok(body.to_vec())
    }

    #[cfg(not(unix))]
    async fn fetch(&self, _endpoint: &str) -> Result<Vec<u8>, LocalApiError> {
        Err(LocalApiError::Unsupported)
    }
}

impl Default for LocalApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a raw HTTP response into status code and body.
fn parse_response(raw: &[u8]) -> Result<(u16, &[u8]), LocalApiError> {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| LocalApiError::Malformed("missing header terminator".into()))?;

    let head = std::str::from_utf8(&raw[..split])
        .map_err(|_| LocalApiError::Malformed("non-UTF-8 response head".into()))?;
    let status_line = head.lines().next().unwrap_or_default();

    if !status_line.starts_with("HTTP/") {
        return Err(LocalApiError::Malformed(format!(
            "bad status line: {status_line:?}"
        )));
    }
    let code = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| LocalApiError::Malformed(format!("bad status line: {status_line:?}")))?;

    Ok((code, &raw[split + 4..]))
}
