//! Cheap RTSP reachability check.
//!
//! A TCP connect to the RTSP port is enough to tell a dead address from a
//! live one without paying for an ffprobe run.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default connect timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

const DEFAULT_RTSP_PORT: u16 = 554;

/// Whether the URL is a placeholder generated for a camera with no real
/// RTSP entry (its last path segment starts with `camera-`).
pub fn is_placeholder(url: &str) -> bool {
    url.trim_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|seg| seg.starts_with("camera-"))
}

/// Extract `(host, port)` from an `rtsp://` URL.
pub fn host_port(url: &str) -> Option<(String, u16)> {
    let rest = url.strip_prefix("rtsp://").unwrap_or(url);
    let authority = rest.split('/').next()?;
    let authority = authority.rsplit('@').next()?;
    if authority.is_empty() {
        return None;
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => Some((host.to_string(), port.parse().ok()?)),
        None => Some((authority.to_string(), DEFAULT_RTSP_PORT)),
    }
}

/// Check whether an RTSP source is worth starting a decoder for.
pub async fn rtsp_available(url: &str, connect_timeout: Duration) -> bool {
    if is_placeholder(url) {
        warn!(url, "Placeholder RTSP address, not connecting");
        return false;
    }

    let Some((host, port)) = host_port(url) else {
        warn!(url, "Unparseable RTSP address");
        return false;
    };

    match timeout(connect_timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!(url, error = %e, "RTSP port unreachable");
            false
        }
        Err(_) => {
            debug!(url, "RTSP connect timed out");
            false
        }
    }
}
