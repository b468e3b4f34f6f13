//! Page fetching
//!
//! [`PageFetcher`] is the seam between the crawler and the network.
//! [`HttpFetcher`] is the reqwest-backed implementation used at runtime.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::CrawlConfig;
use crate::types::{DigestError, Result};

/// Response data the crawler needs from one fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    /// Body text; empty when the response is not HTML
    pub body: String,
}

impl FetchedPage {
    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type.as_deref())
    }
}

fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

/// Fetch capability used by the crawler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Only 2xx and 3xx responses are returned as `Ok`.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

/// HTTP fetcher with a per-request timeout and fixed user agent
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DigestError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DigestError::timeout(format!("fetching {}", url), self.timeout)
                } else {
                    DigestError::Http(e)
                }
            })?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(DigestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        // Skip downloading bodies the crawler will not use
        let body = if is_html_content_type(content_type.as_deref()) {
            response.text().await.map_err(|e| {
                if e.is_timeout() {
                    DigestError::timeout(format!("reading {}", url), self.timeout)
                } else {
                    DigestError::Http(e)
                }
            })?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            url: url.clone(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `response` verbatim to every connection
    async fn serve(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&CrawlConfig::default()).unwrap()
    }

    #[test]
    fn test_is_html_content_type() {
        assert!(is_html_content_type(Some("text/html; charset=utf-8")));
        assert!(is_html_content_type(Some("TEXT/HTML")));
        assert!(!is_html_content_type(Some("application/json")));
        assert!(!is_html_content_type(None));
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: 18\r\nConnection: close\r\n\r\n<p>hello world</p>",
        )
        .await;

        let page = fetcher().fetch(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert!(page.is_html());
        assert_eq!(page.body, "<p>hello world</p>");
    }

    #[tokio::test]
    async fn test_non_html_body_is_not_read() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        )
        .await;

        let page = fetcher().fetch(&url).await.unwrap();
        assert!(!page.is_html());
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_rejected() {
        let url = serve(
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, DigestError::HttpStatus { status: 404, .. }));
        assert!(!err.is_fatal());
    }
}
