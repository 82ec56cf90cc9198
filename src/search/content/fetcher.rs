//! HTTP content fetching
//!
//! Downloads article pages with browser-like headers and extracts their text.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::{Host, Url};

use super::config::ContentFetchConfig;
use super::extractor::extract_article_text;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Content fetch error types
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// URL points at a loopback or private host
    #[error("Unsafe URL blocked: {0}")]
    UnsafeUrl(String),
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// HTTP non-success status
    #[error("Unable to fetch content from {1}. Status code: {0}")]
    HttpStatus(u16, String),
    /// No headings or paragraphs could be extracted
    #[error("No content extracted from: {0}")]
    NoContent(String),
}

/// Anything that can turn a URL into article text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its extracted text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Content fetcher backed by reqwest
pub struct ContentFetcher {
    client: Client,
    config: ContentFetchConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: ContentFetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_per_page_secs))
            .default_headers(browser_headers())
            .redirect(redirect_policy(&config))
            .build()
            .map_err(|e| FetchError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch a page and return its raw HTML
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        if !self.config.allow_private_hosts && !Self::is_public_host(&parsed) {
            return Err(FetchError::UnsafeUrl(url.to_string()));
        }

        debug!("Fetching content from: {}", url);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))
    }

    /// Check whether a URL's host is safe to fetch
    ///
    /// Rejects localhost, loopback, private, link-local and unspecified
    /// addresses.
    pub fn is_public_host(url: &Url) -> bool {
        match url.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.to_lowercase();
                domain != "localhost" && !domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
            None => false,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ContentFetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for ContentFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let html = self.fetch_html(url).await?;
        let text = extract_article_text(&html);

        if text.is_empty() {
            return Err(FetchError::NoContent(url.to_string()));
        }

        info!("Fetched {} chars from: {}", text.len(), url);
        Ok(text)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Follow at most `max_redirects` hops, re-checking the host of each one
fn redirect_policy(config: &ContentFetchConfig) -> Policy {
    let max_redirects = config.max_redirects;
    let allow_private_hosts = config.allow_private_hosts;
    Policy::custom(move |attempt| {
        match check_redirect(
            attempt.url(),
            attempt.previous().len(),
            max_redirects,
            allow_private_hosts,
        ) {
            Ok(()) => attempt.follow(),
            Err(reason) => attempt.error(reason),
        }
    })
}

fn check_redirect(
    target: &Url,
    hops: usize,
    max_redirects: usize,
    allow_private_hosts: bool,
) -> Result<(), String> {
    if hops > max_redirects {
        return Err(format!("too many redirects (max {})", max_redirects));
    }
    if !matches!(target.scheme(), "http" | "https") {
        return Err(format!("redirect to unsupported scheme: {}", target));
    }
    if !allow_private_hosts && !ContentFetcher::is_public_host(target) {
        return Err(format!("redirect to private host blocked: {}", target));
    }
    Ok(())
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let unique_local = (v6.segments()[0] & 0xfe00) == 0xfc00;
            let link_local = (v6.segments()[0] & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}
