//! External converter invocation.
//!
//! The actual rendering is done by wkhtmltopdf (PDF) and pandoc (EPUB),
//! run as child processes. Commands are built as argument vectors; titles,
//! URLs, and filenames never pass through a shell. A missing binary and a
//! non-zero exit are distinct, classified errors; a zero exit is the success
//! contract, and the expected output file is not checked afterwards. No
//! timeout is applied to a converter: a hung binary hangs the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};

use crate::artifact::{self, METADATA_FILENAME};
use crate::{FolioError, Result};

/// Captured output of a converter that exited successfully.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub stdout: String,
    pub stderr: String,
}

/// wkhtmltopdf invocation: staged `<base>.html` in, `<base>.pdf` out.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Path to the wkhtmltopdf binary.
    pub binary: PathBuf,
    /// Page size passed to `--page-size` (e.g. "A4", "Letter").
    pub page_size: String,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self { binary: PathBuf::from("wkhtmltopdf"), page_size: "A4".to_string() }
    }
}

impl PdfRenderer {
    /// The argument vector for one conversion, without the binary itself.
    pub fn command_args(&self, dir: &Path, base: &str) -> Vec<OsString> {
        vec![
            OsString::from("--page-size"),
            OsString::from(&self.page_size),
            dir.join(artifact::pdf_source_name(base)).into_os_string(),
            dir.join(format!("{base}.pdf")).into_os_string(),
        ]
    }

    /// Converts the staged PDF source for `base` in `dir`.
    pub fn render(&self, dir: &Path, base: &str) -> Result<RenderOutput> {
        run_converter(&self.binary, &self.command_args(dir, base))
    }
}

/// pandoc invocation: staged `<base>_epub.html` plus a generated
/// `metadata.xml` in, `<base>.epub` out.
#[derive(Debug, Clone)]
pub struct EpubRenderer {
    /// Path to the pandoc binary.
    pub binary: PathBuf,
    /// Dublin Core language tag for the book (e.g. "en").
    pub language: String,
    /// Optional stylesheet applied to the EPUB.
    pub stylesheet: Option<PathBuf>,
    /// Optional cover image.
    pub cover_image: Option<PathBuf>,
    /// Optional ISBN; when present it becomes the book identifier.
    pub isbn: Option<String>,
}

impl Default for EpubRenderer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pandoc"),
            language: "en".to_string(),
            stylesheet: None,
            cover_image: None,
            isbn: None,
        }
    }
}

impl EpubRenderer {
    /// The Dublin Core metadata document handed to pandoc via
    /// `--epub-metadata`.
    ///
    /// An absent or empty ISBN omits the identifier element entirely.
    pub fn metadata_xml(&self, title: &str, generated_at: DateTime<Utc>) -> String {
        let mut xml = String::new();
        xml.push_str(&format!("<dc:title>{}</dc:title>\n", escape_xml(title)));
        xml.push_str(&format!("<dc:language>{}</dc:language>\n", escape_xml(&self.language)));
        xml.push_str(&format!(
            "<dc:date>{}</dc:date>\n",
            generated_at.format("%Y-%m-%dT%H:%M:%S")
        ));
        if let Some(isbn) = self.isbn.as_deref().filter(|isbn| !isbn.is_empty()) {
            xml.push_str(&format!(
                "<dc:identifier id=\"isbn\">{}</dc:identifier>\n",
                escape_xml(isbn)
            ));
        }
        xml
    }

    /// The argument vector for one conversion, without the binary itself.
    pub fn command_args(&self, dir: &Path, base: &str) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("-f"),
            OsString::from("html"),
            OsString::from("-t"),
            OsString::from("epub"),
            OsString::from("-s"),
            OsString::from("--epub-metadata"),
            dir.join(METADATA_FILENAME).into_os_string(),
            OsString::from("-o"),
            dir.join(format!("{base}.epub")).into_os_string(),
        ];
        if let Some(stylesheet) = &self.stylesheet {
            args.push(OsString::from("-c"));
            args.push(stylesheet.clone().into_os_string());
        }
        if let Some(cover) = &self.cover_image {
            args.push(OsString::from("--epub-cover-image"));
            args.push(cover.clone().into_os_string());
        }
        args.push(dir.join(artifact::epub_source_name(base)).into_os_string());
        args
    }

    /// Stages `metadata.xml` and converts the staged EPUB source for `base`
    /// in `dir`. A failed metadata write gates the conversion.
    pub fn render(&self, dir: &Path, base: &str, title: &str) -> Result<RenderOutput> {
        let metadata = self.metadata_xml(title, Utc::now());
        artifact::write_html(dir, METADATA_FILENAME, &metadata)?;
        run_converter(&self.binary, &self.command_args(dir, base))
    }
}

/// Runs a converter to completion, capturing its output.
///
/// Exit-status policy: spawn failure with `NotFound` means the binary is
/// missing; any non-zero exit is a converter failure carrying the captured
/// stderr; a zero exit is success.
fn run_converter(binary: &Path, args: &[OsString]) -> Result<RenderOutput> {
    let output = Command::new(binary).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FolioError::ConverterNotFound { binary: binary.to_path_buf() }
        } else {
            FolioError::Io(e)
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(FolioError::ConverterFailed {
            converter: binary
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("converter")
                .to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(RenderOutput { stdout, stderr })
}

/// Minimal XML escaping for metadata element text.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_pdf_command_args() {
        let renderer = PdfRenderer { binary: PathBuf::from("wkhtmltopdf"), page_size: "Letter".to_string() };
        let args = renderer.command_args(Path::new("/work"), "article");
        assert_eq!(
            args,
            vec![
                OsString::from("--page-size"),
                OsString::from("Letter"),
                OsString::from("/work/article.html"),
                OsString::from("/work/article.pdf"),
            ]
        );
    }

    #[test]
    fn test_epub_command_args_minimal() {
        let renderer = EpubRenderer::default();
        let args = renderer.command_args(Path::new("/work"), "article");
        assert_eq!(args.first(), Some(&OsString::from("-f")));
        assert!(args.contains(&OsString::from("/work/metadata.xml")));
        assert!(args.contains(&OsString::from("/work/article.epub")));
        assert_eq!(args.last(), Some(&OsString::from("/work/article_epub.html")));
        assert!(!args.contains(&OsString::from("--epub-cover-image")));
    }

    #[test]
    fn test_epub_command_args_with_extras() {
        let renderer = EpubRenderer {
            stylesheet: Some(PathBuf::from("/styles/book.css")),
            cover_image: Some(PathBuf::from("/img/cover.png")),
            ..EpubRenderer::default()
        };
        let args = renderer.command_args(Path::new("/work"), "article");
        let rendered: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(rendered.windows(2).any(|w| w == ["-c", "/styles/book.css"]));
        assert!(rendered.windows(2).any(|w| w == ["--epub-cover-image", "/img/cover.png"]));
    }

    #[test]
    fn test_metadata_without_isbn() {
        let renderer = EpubRenderer::default();
        let xml = renderer.metadata_xml("A Book", fixed_time());
        assert!(xml.contains("<dc:title>A Book</dc:title>"));
        assert!(xml.contains("<dc:language>en</dc:language>"));
        assert!(xml.contains("<dc:date>2024-03-09T14:30:05</dc:date>"));
        assert!(!xml.contains("dc:identifier"));
    }

    #[test]
    fn test_metadata_with_isbn() {
        let renderer = EpubRenderer { isbn: Some("978-3-16-148410-0".to_string()), ..EpubRenderer::default() };
        let xml = renderer.metadata_xml("A Book", fixed_time());
        assert!(xml.contains(r#"<dc:identifier id="isbn">978-3-16-148410-0</dc:identifier>"#));
    }

    #[test]
    fn test_metadata_empty_isbn_omitted() {
        let renderer = EpubRenderer { isbn: Some(String::new()), ..EpubRenderer::default() };
        let xml = renderer.metadata_xml("A Book", fixed_time());
        assert!(!xml.contains("dc:identifier"));
    }

    #[test]
    fn test_metadata_title_escaped() {
        let renderer = EpubRenderer::default();
        let xml = renderer.metadata_xml("Tom & <Jerry>", fixed_time());
        assert!(xml.contains("<dc:title>Tom &amp; &lt;Jerry&gt;</dc:title>"));
    }

    #[test]
    fn test_missing_binary_classified() {
        let result = run_converter(Path::new("/nonexistent/converter-binary"), &[]);
        assert!(matches!(result, Err(FolioError::ConverterNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_classified() {
        let result = run_converter(Path::new("/bin/false"), &[]);
        match result {
            Err(FolioError::ConverterFailed { converter, code, .. }) => {
                assert_eq!(converter, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("expected ConverterFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_captures_output() {
        let output = run_converter(Path::new("/bin/echo"), &[OsString::from("hello")]).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }
}
