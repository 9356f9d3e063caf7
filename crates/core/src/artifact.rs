//! Staging of intermediate files onto the working directory.
//!
//! Every file of a run shares one base name, derived from the requested
//! output filename: `<base>.html` is the PDF source, `<base>_epub.html` the
//! EPUB source, `metadata.xml` the EPUB metadata side file, and
//! `<base>.pdf` / `<base>.epub` the converter outputs. Staged files are left
//! on disk after the run; cleanup is the caller's business.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Name of the EPUB metadata side file.
pub const METADATA_FILENAME: &str = "metadata.xml";

/// Derives the shared base name from the requested output filename by
/// stripping the final extension.
///
/// `article.pdf` and `article` both yield `article`; directory components
/// are dropped (the working directory is configured separately).
pub fn base_name(output_filename: &str) -> String {
    Path::new(output_filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("folio")
        .to_string()
}

/// Filename of the staged PDF-source HTML for a base name.
pub fn pdf_source_name(base: &str) -> String {
    format!("{base}.html")
}

/// Filename of the staged EPUB-source HTML for a base name.
pub fn epub_source_name(base: &str) -> String {
    format!("{base}_epub.html")
}

/// Writes UTF-8 contents to `folder/filename`, truncating any existing
/// file, and returns the full path.
///
/// I/O failures propagate; the orchestrator maps a failed write to "do not
/// render this target" rather than aborting the run.
pub fn write_html(folder: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    let path = folder.join(filename);
    fs::write(&path, contents)?;
    Ok(path)
}
