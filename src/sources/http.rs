use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::errors::{NewsError, NewsResult};
use crate::sources::query::redact_api_key;
use crate::sources::traits::BodyFetcher;

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Blocking HTTP GET client for the news API.
///
/// Every request gets its own client and single-threaded runtime, both
/// dropped before returning, so the connection is released on success, on a
/// bad status and on error. Must run on a blocking thread, never on an async
/// executor.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
        }
    }

    /// GET `url` and return the body decoded as UTF-8. Anything but 200 is an error.
    pub fn try_fetch(&self, url: &str) -> NewsResult<String> {
        let parsed = Url::parse(url).map_err(|e| NewsError::InvalidUrl(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(self.get(parsed))
    }

    async fn get(&self, url: Url) -> NewsResult<String> {
        // The read timeout bounds each socket read, not the whole request
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()?;

        let response = client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url) {
            Ok(body) => {
                debug!(url = %redact_api_key(url), bytes = body.len(), "Fetched response body");
                body
            }
            Err(NewsError::HttpStatus(status)) => {
                warn!(url = %redact_api_key(url), status, "Error response code");
                String::new()
            }
            Err(e) => {
                warn!(url = %redact_api_key(url), error = %e, "Problem retrieving the news JSON results");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn fetch_blocking(url: String) -> (NewsResult<String>, String) {
        tokio::task::spawn_blocking(move || {
            let fetcher = HttpFetcher::new();
            (fetcher.try_fetch(&url), fetcher.fetch(&url))
        })
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ok_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response":{}}"#))
            .mount(&server)
            .await;

        let url = format!("{}/search?q=rust", server.uri());
        let (result, body) = fetch_blocking(url).await;

        assert_eq!(result.unwrap(), r#"{"response":{}}"#);
        assert_eq!(body, r#"{"response":{}}"#);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_not_found_yields_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let (result, body) = fetch_blocking(url).await;

        assert!(matches!(result, Err(NewsError::HttpStatus(404))));
        assert_eq!(body, "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_other_success_codes_are_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let (result, body) = fetch_blocking(url).await;

        assert!(matches!(result, Err(NewsError::HttpStatus(204))));
        assert_eq!(body, "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_utf8_is_replaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'o', b'k', 0xff]))
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let (result, _) = fetch_blocking(url).await;

        assert_eq!(result.unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_malformed_url_yields_empty_body() {
        let fetcher = HttpFetcher::new();

        assert!(matches!(
            fetcher.try_fetch("not a url"),
            Err(NewsError::InvalidUrl(_))
        ));
        assert_eq!(fetcher.fetch("not a url"), "");
    }

    #[test]
    fn test_connection_refused_yields_empty_body() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
        let url = format!("http://127.0.0.1:{}/search", port);

        assert!(matches!(fetcher.try_fetch(&url), Err(NewsError::Http(_))));
        assert_eq!(fetcher.fetch(&url), "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stalled_response_hits_read_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let url = format!("{}/search", server.uri());
        let (result, elapsed) = tokio::task::spawn_blocking(move || {
            let fetcher =
                HttpFetcher::with_timeouts(Duration::from_secs(2), Duration::from_millis(300));
            let started = std::time::Instant::now();
            (fetcher.try_fetch(&url), started.elapsed())
        })
        .await
        .unwrap();

        assert!(matches!(result, Err(NewsError::Http(_))));
        assert!(elapsed < Duration::from_secs(4), "took {:?}", elapsed);
    }

    #[test]
    fn test_default_timeouts() {
        let fetcher = HttpFetcher::default();
        assert_eq!(fetcher.connect_timeout, Duration::from_millis(15_000));
        assert_eq!(fetcher.read_timeout, Duration::from_millis(10_000));
    }
}
