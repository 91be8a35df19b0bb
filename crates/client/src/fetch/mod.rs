//! HTTP fetch pipeline shared by both extraction pipelines.
//!
//! ### Page fetches
//! - Identifying User-Agent, per-request timeout, bounded redirects
//! - Non-2xx statuses are errors; callers catch them per URL
//!
//! ### Bounded downloads
//! - `fetch_bounded` streams the body and aborts the moment the running
//!   total exceeds the byte cap, returning `Ok(None)` instead of a
//!   partial buffer. Content-Length is only an optimization: a HEAD
//!   answer above the cap skips the GET, but the streaming check is the
//!   guard, since Content-Length may be absent or wrong.

pub mod url;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, normalize};

use pagesift_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string sent with every request.
    pub user_agent: String,

    /// Request timeout (default: 10s).
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5).
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        let timeout = app.timeout();
        Self { user_agent: app.user_agent, timeout, max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), max_redirects: 5 }
    }
}

/// Response from a page fetch.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// The normalized URL that was requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Decoded response body
    pub html: String,
}

/// HTTP fetch client wrapping a pooled `reqwest::Client`.
///
/// The underlying connection pool is the only state shared across
/// calls; there is no other cross-call mutation.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a page, returning its decoded body and status.
    ///
    /// Timeouts, connection failures, and non-2xx statuses are all
    /// errors here; the batch layer absorbs them per URL.
    pub async fn fetch_page(&self, url_str: &str) -> Result<PageResponse, Error> {
        let start = Instant::now();
        let url = normalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(map_send_error)?;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            start.elapsed().as_millis(),
            html.len()
        );

        Ok(PageResponse { url, final_url, status, html })
    }

    /// Download a body of at most `max_bytes`, streaming and aborting
    /// cooperatively. Returns `Ok(None)` when the cap is exceeded --
    /// never a partial buffer.
    pub async fn fetch_bounded(&self, url: &Url, max_bytes: usize) -> Result<Option<Bytes>, Error> {
        // HEAD short-circuit. A failed HEAD is ignored, not an error:
        // plenty of servers reject HEAD but serve GET fine.
        if let Ok(head) = self.http.head(url.as_str()).send().await
            && head.status().is_success()
            && let Some(len) = declared_length(head.headers())
            && len as usize > max_bytes
        {
            tracing::debug!("skipping {}: declared {} bytes exceeds cap {}", url, len, max_bytes);
            return Ok(None);
        }

        let response = self.http.get(url.as_str()).send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let mut buf = BytesMut::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_send_error)?;
            if buf.len() + chunk.len() > max_bytes {
                tracing::debug!("aborting {}: body exceeds cap {}", url, max_bytes);
                return Ok(None);
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(Some(buf.freeze()))
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn declared_length(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

fn map_send_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::FetchTimeout(e.to_string())
    } else {
        Error::HttpError(format!("network error: {}", e))
    }
}
