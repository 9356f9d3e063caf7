use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("folio")
        .version("0.1.0")
        .author("Folio Contributors")
        .about("Render web pages into reading-friendly documents")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(<OUTPUT> "Output filename whose stem names every artifact"))
        .arg(clap::arg!(--noclean "Skip readability cleaning and use the fetched content verbatim"))
        .arg(clap::arg!(--no_epub "Render the PDF only"))
        .arg(
            clap::arg!(-d --output_dir <DIR> "Working directory for staged and rendered files")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--config <FILE> "Settings file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--page_size <SIZE> "PDF page size"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--referrer <URL> "Referer header for HTTP requests"))
        .arg(clap::arg!(--timeout <SECS> "Overall HTTP timeout in seconds"))
        .arg(clap::arg!(--connect_timeout <SECS> "HTTP connect timeout in seconds"))
        .arg(clap::arg!(--language <LANG> "EPUB language tag"))
        .arg(clap::arg!(--isbn <ISBN> "ISBN recorded in the EPUB metadata"))
        .arg(
            clap::arg!(--cover_image <FILE> "EPUB cover image")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--stylesheet <FILE> "EPUB stylesheet")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--frame <FILE> "HTML template overriding the built-in PDF reading frame")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--wkhtmltopdf <BIN> "Path to the wkhtmltopdf binary"))
        .arg(clap::arg!(--pandoc <BIN> "Path to the pandoc binary"))
        .arg(clap::arg!(--json "Print the pipeline report as JSON on stdout"))
        .arg(clap::arg!(-v --verbose "Enable step-by-step diagnostics"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "folio", &completions_dir).unwrap();
}
