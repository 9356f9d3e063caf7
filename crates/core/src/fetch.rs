//! Content fetching from URLs, files, and stdin.
//!
//! This module retrieves the raw bytes the rest of the pipeline works on.
//! HTTP fetching issues a single GET with bounded connect and overall
//! timeouts, follows redirects, and keeps a cookie jar only for the duration
//! of that one request. There are no retries.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{FolioError, Result};

/// HTTP client configuration for fetching web pages.
///
/// This struct controls timeout and identity settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Connect timeout in seconds.
    pub connect_timeout: u64,
    /// Overall request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Optional Referer header value.
    pub referrer: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 5,
            timeout: 8,
            user_agent: "Mozilla/5.0 (compatible; Folio/0.1; +https://github.com/folio-press/folio)".to_string(),
            referrer: None,
        }
    }
}

/// A successfully fetched page, before any decoding.
///
/// `content_type` carries the raw `Content-Type` header so the decoder can
/// honor a declared charset; `final_url` is the URL after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub final_url: String,
}

/// Fetches the raw body bytes of a URL.
///
/// Performs a single HTTP GET, following redirects, with the configured
/// timeouts, User-Agent, and optional Referer. A per-request cookie jar is
/// kept so redirect chains that set cookies still resolve; nothing persists
/// across calls. Failures are classified: invalid URL, timeout, transport
/// error, or non-2xx status.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchedPage> {
    let parsed_url = Url::parse(url).map_err(|e| FolioError::InvalidUrl(e.to_string()))?;

    if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
        return Err(FolioError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .timeout(Duration::from_secs(config.timeout))
        .cookie_store(true)
        .build()
        .map_err(FolioError::Http)?;

    let mut request = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9");

    if let Some(referrer) = &config.referrer {
        request = request.header("Referer", referrer);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            FolioError::Timeout { timeout: config.timeout }
        } else {
            FolioError::Http(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FolioError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let final_url = response.url().to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                FolioError::Timeout { timeout: config.timeout }
            } else {
                FolioError::Http(e)
            }
        })?
        .to_vec();

    Ok(FetchedPage { bytes, content_type, final_url })
}

/// Reads raw HTML bytes from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<Vec<u8>> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(FolioError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path_buf.display()),
        )))
    } else {
        fs::read(&path_buf).map_err(FolioError::from)
    }
}

/// Reads raw HTML bytes from standard input until EOF.
///
/// Useful for piping content from other commands.
pub fn fetch_stdin() -> Result<Vec<u8>> {
    use std::io::Read;

    let mut buffer = Vec::new();
    std::io::stdin().read_to_end(&mut buffer).map_err(FolioError::from)?;

    Ok(buffer)
}
