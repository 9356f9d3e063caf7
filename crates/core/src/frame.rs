//! The HTML reading frame used for PDF conversion.
//!
//! EPUB layout is controlled by its own stylesheet, so the bare extracted
//! fragment is enough there. PDF conversion renders exactly what it is
//! given, so the cleaned content is wrapped in a wide-margin template that
//! carries the title and the source URL.

use std::path::Path;

use crate::Result;

/// Built-in wide-margin reading frame.
///
/// Placeholders: `{title}`, `{url}`, `{content}`.
const DEFAULT_FRAME: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {
    margin: 3em 18%;
    font-family: Georgia, "Times New Roman", serif;
    font-size: 12pt;
    line-height: 1.6;
    color: #1a1a1a;
}
h1.folio-title {
    font-size: 1.6em;
    line-height: 1.25;
    margin-bottom: 0.25em;
}
p.folio-source {
    font-size: 0.85em;
    color: #555;
    border-bottom: 1px solid #ccc;
    padding-bottom: 1em;
    margin-bottom: 2em;
    word-break: break-all;
}
img { max-width: 100%; }
pre { white-space: pre-wrap; }
</style>
</head>
<body>
<h1 class="folio-title">{title}</h1>
<p class="folio-source"><a href="{url}">{url}</a></p>
{content}
</body>
</html>
"#;

/// An HTML template wrapping cleaned content with title and source-URL
/// chrome for PDF conversion.
#[derive(Debug, Clone)]
pub struct FrameTemplate {
    template: String,
}

impl Default for FrameTemplate {
    fn default() -> Self {
        Self { template: DEFAULT_FRAME.to_string() }
    }
}

impl FrameTemplate {
    /// Uses the given template text instead of the built-in frame.
    pub fn from_string(template: String) -> Self {
        Self { template }
    }

    /// Loads a template from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self { template: std::fs::read_to_string(path)? })
    }

    /// Renders the frame around the given content.
    ///
    /// `title` and `url` are HTML-escaped; `content` is already HTML and is
    /// inserted verbatim.
    pub fn render(&self, title: &str, url: &str, content: &str) -> String {
        substitute(
            &self.template,
            &[
                ("title", &escape_html(title)),
                ("url", &escape_html(url)),
                ("content", content),
            ],
        )
    }
}

/// Replaces `{name}` placeholders in a single left-to-right pass, so
/// substituted values are never themselves re-scanned for placeholders.
/// Unknown placeholders are left untouched.
fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('}') {
            Some(close) => {
                let name = &after[1..close];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&after[..close + 1]),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Minimal HTML escaping for text interpolated into the frame.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
