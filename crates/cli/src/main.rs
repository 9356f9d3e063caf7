use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use folio_core::{RunOptions, Settings, StageOutcome, decode_html, fetch_file, fetch_stdin};

mod echo;
use echo::{format_size, print_banner, print_error, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a web page into reading-friendly PDF and EPUB documents
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author = "Folio Contributors")]
#[command(version = VERSION)]
#[command(about = "Render web pages into reading-friendly documents", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output filename whose stem names every artifact (e.g. article.pdf)
    #[arg(value_name = "OUTPUT")]
    output: String,

    /// Skip readability cleaning and use the fetched content verbatim
    #[arg(long)]
    noclean: bool,

    /// Render the PDF only
    #[arg(long)]
    no_epub: bool,

    /// Working directory for staged and rendered files
    #[arg(short = 'd', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Settings file (default: <config-dir>/folio/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// PDF page size (e.g. A4, Letter)
    #[arg(long, value_name = "SIZE")]
    page_size: Option<String>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Referer header for HTTP requests
    #[arg(long, value_name = "URL")]
    referrer: Option<String>,

    /// Overall HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// HTTP connect timeout in seconds
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// EPUB language tag
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// ISBN recorded in the EPUB metadata
    #[arg(long, value_name = "ISBN")]
    isbn: Option<String>,

    /// EPUB cover image
    #[arg(long, value_name = "FILE")]
    cover_image: Option<PathBuf>,

    /// EPUB stylesheet
    #[arg(long, value_name = "FILE")]
    stylesheet: Option<PathBuf>,

    /// HTML template overriding the built-in PDF reading frame
    #[arg(long, value_name = "FILE")]
    frame: Option<PathBuf>,

    /// Path to the wkhtmltopdf binary
    #[arg(long, value_name = "BIN")]
    wkhtmltopdf: Option<PathBuf>,

    /// Path to the pandoc binary
    #[arg(long, value_name = "BIN")]
    pandoc: Option<PathBuf>,

    /// Print the pipeline report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable step-by-step diagnostics
    #[arg(short, long)]
    verbose: bool,
}

/// Settings file first, flags on top.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(size) = &args.page_size {
        settings.page_size = size.clone();
    }
    if let Some(ua) = &args.user_agent {
        settings.user_agent = ua.clone();
    }
    if let Some(referrer) = &args.referrer {
        settings.referrer = Some(referrer.clone());
    }
    if let Some(timeout) = args.timeout {
        settings.timeout = timeout;
    }
    if let Some(connect_timeout) = args.connect_timeout {
        settings.connect_timeout = connect_timeout;
    }
    if let Some(language) = &args.language {
        settings.language = language.clone();
    }
    if let Some(cover) = &args.cover_image {
        settings.cover_image = Some(cover.clone());
    }
    if let Some(stylesheet) = &args.stylesheet {
        settings.stylesheet = Some(stylesheet.clone());
    }
    if let Some(frame) = &args.frame {
        settings.frame_template = Some(frame.clone());
    }
    if let Some(binary) = &args.wkhtmltopdf {
        settings.wkhtmltopdf = binary.clone();
    }
    if let Some(binary) = &args.pandoc {
        settings.pandoc = binary.clone();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.verbose {
        print_banner();
    }

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    apply_overrides(&mut settings, &args);

    let mut pipeline = settings.pipeline().context("Failed to assemble pipeline")?;
    pipeline.epub.isbn = args.isbn.clone();

    let options = RunOptions { clean: !args.noclean, epub: !args.no_epub };

    let report = if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if args.verbose {
            print_step(1, 1, &format!("Fetching and rendering {}", args.input));
        }
        pipeline
            .run(&args.input, &args.output, &options)
            .await
            .with_context(|| format!("Failed to process {}", args.input))?
    } else {
        let bytes = if args.input == "-" {
            if args.verbose {
                print_step(1, 2, "Reading from stdin");
            }
            fetch_stdin().context("Failed to read from stdin")?
        } else {
            if args.verbose {
                print_step(1, 2, &format!("Reading from file {}", args.input));
            }
            fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
        };

        if args.verbose {
            print_info(&format!("Read {}", format_size(bytes.len())));
            print_step(2, 2, "Staging and rendering");
        }

        let decoded = decode_html(&bytes, None);
        pipeline
            .process(&decoded.html, None, &args.output, &options)
            .with_context(|| format!("Failed to process {}", args.input))?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    for (label, outcome) in [("PDF", &report.pdf), ("EPUB", &report.epub)] {
        match outcome {
            StageOutcome::Rendered { output } => {
                print_success(&format!("{} rendered: {}", label, output.display()));
            }
            StageOutcome::Skipped { reason } => {
                if args.verbose {
                    print_info(&format!("{} skipped: {}", label, reason));
                }
            }
            StageOutcome::Failed { error } => {
                print_error(&format!("{} failed: {}", label, error));
            }
        }
    }

    if report.fully_rendered() {
        Ok(ExitCode::SUCCESS)
    } else {
        print_warning("Not every requested output was rendered");
        Ok(ExitCode::FAILURE)
    }
}
