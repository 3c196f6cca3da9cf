use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::errors::{NewsError, NewsResult};

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Yes/no answer to "can we reach the network right now"
#[cfg_attr(test, mockall::automock)]
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Probes connectivity by opening a TCP connection to the API host
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Probe the host and port that `url` points at
    pub fn for_url(url: &str) -> NewsResult<Self> {
        let parsed = Url::parse(url).map_err(|e| NewsError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| NewsError::InvalidUrl("Missing host in URL".to_string()))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| NewsError::InvalidUrl("Missing port in URL".to_string()))?;

        Ok(Self::new(host, port))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ConnectivityProbe for TcpConnectivityProbe {
    fn is_connected(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(host = %self.host, error = %e, "Could not resolve host");
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => return true,
                Err(e) => debug!(%addr, error = %e, "Connectivity probe failed"),
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_for_url_uses_default_https_port() {
        let probe = TcpConnectivityProbe::for_url("https://content.guardianapis.com/search").unwrap();
        assert_eq!(probe.host, "content.guardianapis.com");
        assert_eq!(probe.port, 443);
    }

    #[test]
    fn test_for_url_uses_explicit_port() {
        let probe = TcpConnectivityProbe::for_url("http://127.0.0.1:8080/search").unwrap();
        assert_eq!(probe.host, "127.0.0.1");
        assert_eq!(probe.port, 8080);
    }

    #[test]
    fn test_for_url_rejects_invalid_url() {
        assert!(matches!(
            TcpConnectivityProbe::for_url("nonsense"),
            Err(NewsError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_connected_when_listener_present() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpConnectivityProbe::new("127.0.0.1", port);
        assert!(probe.is_connected());
    }

    #[test]
    fn test_not_connected_when_nothing_listens() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let probe = TcpConnectivityProbe::new("127.0.0.1", port)
            .with_timeout(Duration::from_millis(500));
        assert!(!probe.is_connected());
    }
}
