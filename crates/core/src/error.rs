//! Error types for Folio operations.
//!
//! This module defines the main error type [`FolioError`] which represents
//! all possible errors that can occur while fetching a page, staging
//! intermediate artifacts, and invoking the external converters.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the fetch-clean-render pipeline.
///
/// The fetch variants replace the original design's swallowed network
/// exceptions: callers can tell a timeout from a DNS failure from a non-2xx
/// status. The converter variants replace its unchecked subprocesses.
///
/// # Example
///
/// ```rust
/// use folio_core::{FolioError, fetch::FetchConfig};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// match folio_core::fetch::fetch_url("not-a-url", &FetchConfig::default()).await {
///     Ok(page) => println!("{} bytes", page.bytes.len()),
///     Err(FolioError::InvalidUrl(reason)) => println!("bad url: {}", reason),
///     Err(e) => println!("fetch failed: {}", e),
/// }
/// # });
/// ```
#[derive(Error, Debug)]
pub enum FolioError {
    /// HTTP transport errors from reqwest.
    ///
    /// Wraps connection failures, DNS errors, TLS problems, and other
    /// network-level issues.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured overall timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The readability library could not process the document.
    #[error("Content extraction failed: {0}")]
    Extraction(String),

    /// File I/O errors from staging artifacts or reading templates.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A converter binary could not be spawned because it does not exist.
    #[error("Converter binary not found: {binary}")]
    ConverterNotFound { binary: PathBuf },

    /// A converter ran but exited with a non-zero status.
    ///
    /// Carries the captured stderr so the converter's own diagnostics reach
    /// the user.
    #[error("{converter} exited with status {code:?}: {stderr}")]
    ConverterFailed {
        converter: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Settings file problems (unreadable, unparsable, unknown keys).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for FolioError.
///
/// This is a convenience alias for `std::result::Result<T, FolioError>`.
pub type Result<T> = std::result::Result<T, FolioError>;
