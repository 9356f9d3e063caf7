//! CLI integration tests
//!
//! Converter binaries are replaced with stub scripts so runs complete
//! without wkhtmltopdf or pandoc installed.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("folio").unwrap()
}

fn fixture_path() -> String {
    "../../tests/fixtures/article.html".to_string()
}

fn write_stub(dir: &Path, name: &str, exit_code: i32) -> PathBuf {
    let script = format!("#!/bin/sh\necho 'stub diagnostics' >&2\nexit {}\n", exit_code);
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Working directory plus stub converters, ready to pass as flags.
struct Setup {
    _bin_dir: TempDir,
    out_dir: TempDir,
    wkhtmltopdf: PathBuf,
    pandoc: PathBuf,
}

fn setup(pdf_exit: i32, epub_exit: i32) -> Setup {
    let bin_dir = TempDir::new().unwrap();
    let wkhtmltopdf = write_stub(bin_dir.path(), "wkhtmltopdf", pdf_exit);
    let pandoc = write_stub(bin_dir.path(), "pandoc", epub_exit);
    Setup { _bin_dir: bin_dir, out_dir: TempDir::new().unwrap(), wkhtmltopdf, pandoc }
}

fn run_args(s: &Setup) -> Vec<String> {
    vec![
        "-d".to_string(),
        s.out_dir.path().display().to_string(),
        "--wkhtmltopdf".to_string(),
        s.wkhtmltopdf.display().to_string(),
        "--pandoc".to_string(),
        s.pandoc.display().to_string(),
    ]
}

#[test]
fn test_cli_requires_two_arguments() {
    cmd().assert().failure().stderr(predicate::str::contains("Usage"));
    cmd()
        .arg("https://example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT"));
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reading-friendly"));
}

#[test]
fn test_cli_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_cli_file_input_renders_both_targets() {
    let s = setup(0, 0);
    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .args(run_args(&s))
        .assert()
        .success()
        .stderr(predicate::str::contains("PDF rendered"))
        .stderr(predicate::str::contains("EPUB rendered"));

    assert!(s.out_dir.path().join("article.html").exists());
    assert!(s.out_dir.path().join("article_epub.html").exists());
    assert!(s.out_dir.path().join("metadata.xml").exists());
}

#[test]
fn test_cli_stdin_input() {
    let s = setup(0, 0);
    let html = fs::read_to_string(fixture_path()).unwrap();
    cmd()
        .arg("-")
        .arg("piped.pdf")
        .args(run_args(&s))
        .write_stdin(html)
        .assert()
        .success();

    assert!(s.out_dir.path().join("piped.html").exists());
}

#[test]
fn test_cli_noclean_stages_verbatim() {
    let s = setup(0, 0);
    cmd()
        .arg(fixture_path())
        .arg("raw.pdf")
        .arg("--noclean")
        .args(run_args(&s))
        .assert()
        .success();

    let original = fs::read_to_string(fixture_path()).unwrap();
    let staged = fs::read_to_string(s.out_dir.path().join("raw.html")).unwrap();
    assert_eq!(staged, original);
}

#[test]
fn test_cli_no_epub() {
    let s = setup(0, 0);
    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .arg("--no-epub")
        .args(run_args(&s))
        .assert()
        .success();

    assert!(s.out_dir.path().join("article.html").exists());
    assert!(!s.out_dir.path().join("article_epub.html").exists());
}

#[test]
fn test_cli_json_report() {
    let s = setup(0, 0);
    let output = cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .arg("--json")
        .args(run_args(&s))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["base_name"], "article");
    assert_eq!(report["pdf"]["status"], "rendered");
    assert_eq!(report["epub"]["status"], "rendered");
}

#[test]
fn test_cli_failed_converter_exits_nonzero() {
    let s = setup(1, 0);
    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .args(run_args(&s))
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF failed"))
        .stderr(predicate::str::contains("EPUB rendered"));
}

#[test]
fn test_cli_isbn_in_metadata() {
    let s = setup(0, 0);
    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .args(["--isbn", "978-3-16-148410-0"])
        .args(run_args(&s))
        .assert()
        .success();

    let metadata = fs::read_to_string(s.out_dir.path().join("metadata.xml")).unwrap();
    assert!(metadata.contains("978-3-16-148410-0"));
}

#[test]
fn test_cli_missing_input_file() {
    let s = setup(0, 0);
    cmd()
        .arg("nonexistent.html")
        .arg("article.pdf")
        .args(run_args(&s))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent.html"));
}

#[test]
fn test_cli_bad_config_file() {
    let s = setup(0, 0);
    let config = s.out_dir.path().join("config.toml");
    fs::write(&config, "page_sise = \"Letter\"\n").unwrap();

    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .args(["--config", &config.display().to_string()])
        .args(run_args(&s))
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_cli_config_file_applies() {
    let s = setup(0, 0);
    let config = s.out_dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "output_dir = \"{}\"\nwkhtmltopdf = \"{}\"\npandoc = \"{}\"\n",
            s.out_dir.path().display(),
            s.wkhtmltopdf.display(),
            s.pandoc.display()
        ),
    )
    .unwrap();

    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .args(["--config", &config.display().to_string()])
        .assert()
        .success();

    assert!(s.out_dir.path().join("article.html").exists());
}

#[test]
fn test_cli_verbose() {
    let s = setup(0, 0);
    cmd()
        .arg(fixture_path())
        .arg("article.pdf")
        .arg("-v")
        .args(run_args(&s))
        .assert()
        .success()
        .stderr(predicate::str::contains("Folio"));
}
