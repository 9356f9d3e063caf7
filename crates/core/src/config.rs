//! Configuration loading and assembly.
//!
//! [`Settings`] is the explicit configuration object passed into the
//! pipeline at construction; there is no global settings module. Values
//! come from an optional TOML file (an explicit `--config` path, else
//! `<config-dir>/folio/config.toml`), and the caller overrides individual
//! fields afterwards (the CLI maps its flags on top).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fetch::FetchConfig;
use crate::frame::FrameTemplate;
use crate::pipeline::Pipeline;
use crate::render::{EpubRenderer, PdfRenderer};
use crate::{FolioError, Result};

/// User-facing configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Working directory for staged HTML and rendered outputs.
    pub output_dir: PathBuf,
    /// Default User-Agent for fetches.
    pub user_agent: String,
    /// Optional Referer header for fetches.
    pub referrer: Option<String>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout: u64,
    /// Overall HTTP timeout in seconds.
    pub timeout: u64,
    /// Path to the wkhtmltopdf binary.
    pub wkhtmltopdf: PathBuf,
    /// Path to the pandoc binary.
    pub pandoc: PathBuf,
    /// PDF page size (e.g. "A4", "Letter").
    pub page_size: String,
    /// EPUB language tag.
    pub language: String,
    /// Optional EPUB stylesheet.
    pub stylesheet: Option<PathBuf>,
    /// Optional EPUB cover image.
    pub cover_image: Option<PathBuf>,
    /// Optional file overriding the built-in PDF reading frame.
    pub frame_template: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            output_dir: PathBuf::from("."),
            user_agent: fetch.user_agent,
            referrer: None,
            connect_timeout: fetch.connect_timeout,
            timeout: fetch.timeout,
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            pandoc: PathBuf::from("pandoc"),
            page_size: "A4".to_string(),
            language: "en".to_string(),
            stylesheet: None,
            cover_image: None,
            frame_template: None,
        }
    }
}

impl Settings {
    /// Loads settings from `explicit` when given (missing file is an
    /// error), else from the default location when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config-dir>/folio/config.toml`, platform dependent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    /// Parses a TOML settings file. Unknown keys are rejected.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| FolioError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| FolioError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Assembles the pipeline these settings describe.
    pub fn pipeline(&self) -> Result<Pipeline> {
        let frame = match &self.frame_template {
            Some(path) => FrameTemplate::from_file(path)?,
            None => FrameTemplate::default(),
        };

        Ok(Pipeline {
            output_dir: self.output_dir.clone(),
            fetch: FetchConfig {
                connect_timeout: self.connect_timeout,
                timeout: self.timeout,
                user_agent: self.user_agent.clone(),
                referrer: self.referrer.clone(),
            },
            frame,
            pdf: PdfRenderer { binary: self.wkhtmltopdf.clone(), page_size: self.page_size.clone() },
            epub: EpubRenderer {
                binary: self.pandoc.clone(),
                language: self.language.clone(),
                stylesheet: self.stylesheet.clone(),
                cover_image: self.cover_image.clone(),
                isbn: None,
            },
        })
    }
}
