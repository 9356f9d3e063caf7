//! Boilerplate removal via the readability library.
//!
//! Folio does not implement a readability heuristic of its own; this module
//! is a thin facade over the external library with a two-operation contract:
//! best-effort title, cleaned content fragment. Extraction quality is not
//! inspected here; a mis-detected sidebar degrades output silently.

use std::io::Cursor;

use url::Url;

use crate::{FolioError, Result};

/// The result of cleaning a page: a best-effort title and the main content
/// as an HTML fragment with boilerplate removed.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: String,
    pub content: String,
}

/// Runs readability extraction over an HTML document.
///
/// `url` is optional but recommended: it is used to resolve relative links
/// inside the extracted fragment. A library-level failure (not a quality
/// judgment) is surfaced as [`FolioError::Extraction`].
pub fn extract_article(html: &str, url: Option<&str>) -> Result<Extraction> {
    // The extractor requires a base URL even for local input.
    let base_url = url
        .and_then(|u| Url::parse(u).ok())
        .unwrap_or_else(|| Url::parse("http://localhost/").expect("static URL"));

    let mut cursor = Cursor::new(html.as_bytes());

    let product = readability::extractor::extract(&mut cursor, &base_url)
        .map_err(|e| FolioError::Extraction(e.to_string()))?;

    Ok(Extraction { title: product.title, content: product.content })
}
