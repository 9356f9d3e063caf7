//! Byte-to-text decoding at the fetch boundary.
//!
//! The rest of the pipeline works on UTF-8 strings; this module is the only
//! place encoding is dealt with. Resolution order: byte-order mark, then the
//! charset parameter of the `Content-Type` header, then statistical
//! detection. Malformed sequences decode to replacement characters rather
//! than failing the run.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Raw bytes decoded into UTF-8, with the encoding that was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding: String,
}

/// Decodes fetched bytes into UTF-8 text.
///
/// `content_type` is the raw `Content-Type` header value, if the response
/// carried one.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(header_charset)
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

/// Pulls the charset parameter out of a `Content-Type` header value.
fn header_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches(['"', '\'']).to_string())
            } else {
                None
            }
        })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedHtml {
    let (text, used, _had_errors) = encoding.decode(bytes);
    DecodedHtml { html: text.into_owned(), encoding: used.name().to_string() }
}
