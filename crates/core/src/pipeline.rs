//! The fetch-clean-stage-render orchestrator.
//!
//! Control flow is strictly linear: fetch, decode, clean or keep raw, stage
//! HTML onto the working directory, invoke the converters. A fetch failure
//! terminates the run before anything touches disk. The PDF and EPUB paths
//! are failure-independent: each target's staging write gates only that
//! target's converter, and the run reports a per-stage outcome instead of
//! collapsing everything into one boolean.

use std::path::PathBuf;

use serde::Serialize;

use crate::artifact;
use crate::decode;
use crate::extract::{self, Extraction};
use crate::fetch::{self, FetchConfig};
use crate::frame::FrameTemplate;
use crate::render::{EpubRenderer, PdfRenderer};
use crate::Result;

/// Per-invocation switches.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run readability extraction; `false` stages the fetched text verbatim.
    pub clean: bool,
    /// Produce an EPUB alongside the PDF.
    pub epub: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { clean: true, epub: true }
    }
}

/// How one render target ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The converter ran and exited zero; `output` is the path it was asked
    /// to produce.
    Rendered { output: PathBuf },
    /// The target was not requested.
    Skipped { reason: String },
    /// Staging or conversion failed; the other target is unaffected.
    Failed { error: String },
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }
}

/// Structured result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// What was fetched (URL) or read (file/stdin marker).
    pub source: String,
    /// Document title: extracted in clean mode, the base name otherwise.
    pub title: String,
    /// Whether readability cleaning ran.
    pub cleaned: bool,
    /// Shared stem of every staged and rendered file.
    pub base_name: String,
    pub pdf: StageOutcome,
    pub epub: StageOutcome,
}

impl PipelineReport {
    /// True when every requested target rendered.
    pub fn fully_rendered(&self) -> bool {
        !self.pdf.is_failed() && !self.epub.is_failed()
    }
}

/// The assembled pipeline: configuration for every stage, ready to run.
///
/// A pipeline owns no state between runs; each run owns its staged files in
/// `output_dir` exclusively. Concurrent callers must use separate
/// directories.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Working directory where artifacts are staged and outputs land.
    pub output_dir: PathBuf,
    pub fetch: FetchConfig,
    pub frame: FrameTemplate,
    pub pdf: PdfRenderer,
    pub epub: EpubRenderer,
}

impl Pipeline {
    /// Runs the full pipeline for a URL.
    ///
    /// Fetch and decode, then hand off to [`Pipeline::process`]. A fetch
    /// failure is returned as the classified error with nothing written and
    /// no converter invoked.
    pub async fn run(&self, url: &str, output_filename: &str, options: &RunOptions) -> Result<PipelineReport> {
        let page = fetch::fetch_url(url, &self.fetch).await?;
        let decoded = decode::decode_html(&page.bytes, page.content_type.as_deref());
        self.process(&decoded.html, Some(url), output_filename, options)
    }

    /// Stages and renders already-decoded HTML.
    ///
    /// This is the pipeline minus the network: the entry point for local
    /// files and stdin, and what [`Pipeline::run`] calls after fetching.
    /// `source_url` feeds link resolution and the frame chrome; it is absent
    /// for local input.
    pub fn process(
        &self,
        html: &str,
        source_url: Option<&str>,
        output_filename: &str,
        options: &RunOptions,
    ) -> Result<PipelineReport> {
        let base = artifact::base_name(output_filename);

        let (title, pdf_html, epub_html) = if options.clean {
            let Extraction { title, content } = extract::extract_article(html, source_url)?;
            // A page with no usable title still gets a deterministic one.
            let title = if title.trim().is_empty() { base.clone() } else { title };
            let framed = self.frame.render(&title, source_url.unwrap_or(""), &content);
            (title, framed, content)
        } else {
            // Raw mode: the fetched document is already a full page.
            (base.clone(), html.to_string(), html.to_string())
        };

        let pdf = self.render_pdf(&base, &pdf_html);
        let epub = if options.epub {
            self.render_epub(&base, &epub_html, &title)
        } else {
            StageOutcome::Skipped { reason: "epub output not requested".to_string() }
        };

        Ok(PipelineReport {
            source: source_url.unwrap_or("local input").to_string(),
            title,
            cleaned: options.clean,
            base_name: base,
            pdf,
            epub,
        })
    }

    fn render_pdf(&self, base: &str, pdf_html: &str) -> StageOutcome {
        let source_name = artifact::pdf_source_name(base);
        if let Err(e) = artifact::write_html(&self.output_dir, &source_name, pdf_html) {
            return StageOutcome::Failed { error: format!("could not stage {source_name}: {e}") };
        }
        match self.pdf.render(&self.output_dir, base) {
            Ok(_) => StageOutcome::Rendered { output: self.output_dir.join(format!("{base}.pdf")) },
            Err(e) => StageOutcome::Failed { error: e.to_string() },
        }
    }

    fn render_epub(&self, base: &str, epub_html: &str, title: &str) -> StageOutcome {
        let source_name = artifact::epub_source_name(base);
        if let Err(e) = artifact::write_html(&self.output_dir, &source_name, epub_html) {
            return StageOutcome::Failed { error: format!("could not stage {source_name}: {e}") };
        }
        match self.epub.render(&self.output_dir, base, title) {
            Ok(_) => StageOutcome::Rendered { output: self.output_dir.join(format!("{base}.epub")) },
            Err(e) => StageOutcome::Failed { error: e.to_string() },
        }
    }
}
