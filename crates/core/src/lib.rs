pub mod artifact;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frame;
pub mod pipeline;
pub mod render;

pub use artifact::{METADATA_FILENAME, base_name, epub_source_name, pdf_source_name, write_html};
pub use config::Settings;
pub use decode::{DecodedHtml, decode_html};
pub use error::{FolioError, Result};
pub use extract::{Extraction, extract_article};
pub use fetch::{FetchConfig, FetchedPage, fetch_file, fetch_stdin, fetch_url};
pub use frame::FrameTemplate;
pub use pipeline::{Pipeline, PipelineReport, RunOptions, StageOutcome};
pub use render::{EpubRenderer, PdfRenderer, RenderOutput};
