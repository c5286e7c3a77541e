//! Google Books lookup client.
//!
//! Issues a single bounded-timeout volume search per call. Any network
//! failure, timeout, or non-success status surfaces immediately as
//! `Error::UpstreamUnavailable`; there is no retry.

use async_trait::async_trait;
use bookdex_common::{Error, Result};
use std::time::Duration;
use tracing::debug;

use super::lookup::{MetadataLookupProvider, VolumeList};

/// Lookup client for the Google Books volumes API
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    /// Build a client against `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataLookupProvider for GoogleBooksClient {
    async fn lookup(&self, title: &str) -> Result<VolumeList> {
        let url = format!("{}/volumes", self.base_url);

        debug!(title = %title, url = %url, "Querying book metadata service");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", title), ("maxResults", "1")])
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamUnavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let list: VolumeList = response
            .json()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("Invalid response body: {}", e)))?;

        debug!(title = %title, items = list.items.len(), "Lookup completed");

        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port.
    async fn serve_once(body: String, status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_successful_lookup() {
        let body = r#"{"items":[{"volumeInfo":{"title":"Dune","authors":["Frank Herbert"]}}]}"#;
        let base = serve_once(body.to_string(), "HTTP/1.1 200 OK").await;

        let client = GoogleBooksClient::new(&base, Duration::from_secs(2)).unwrap();
        let list = client.lookup("Dune").await.unwrap();

        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].volume_info.title.as_deref(), Some("Dune"));
    }

    #[tokio::test]
    async fn test_empty_result_set_is_not_an_error() {
        let base = serve_once(r#"{"kind":"books#volumes","totalItems":0}"#.to_string(), "HTTP/1.1 200 OK").await;

        let client = GoogleBooksClient::new(&base, Duration::from_secs(2)).unwrap();
        let list = client.lookup("no such book").await.unwrap();

        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_upstream_unavailable() {
        let base = serve_once("oops".to_string(), "HTTP/1.1 500 Internal Server Error").await;

        let client = GoogleBooksClient::new(&base, Duration::from_secs(2)).unwrap();
        let err = client.lookup("anything").await.unwrap_err();

        assert!(matches!(err, Error::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_without_retry() {
        // Accept the connection and never respond
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(conn);
        });

        let client = GoogleBooksClient::new(
            &format!("http://{}", addr),
            Duration::from_millis(200),
        )
        .unwrap();

        let start = Instant::now();
        let err = client.lookup("anything").await.unwrap_err();

        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        // A retry would at least double the elapsed time
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
