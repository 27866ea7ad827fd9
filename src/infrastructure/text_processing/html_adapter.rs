use std::sync::LazyLock;

use async_trait::async_trait;
use regex::{Captures, Regex};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

use super::text_sanitizer::sanitize_extracted_text;

static INVISIBLE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|head)\b[^>]*>.*?</(script|style|head)\s*>|<!--.*?-->")
        .unwrap()
});

static BLOCK_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<br\s*/?>|</?(p|div|h[1-6]|li|ul|ol|tr|table|section|article|blockquote|pre)\b[^>]*>",
    )
    .unwrap()
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Reduces an HTML fragment (including Confluence storage format) to text.
///
/// Block-level elements become line breaks, remaining markup is dropped and
/// character references are decoded.
pub fn html_to_text(html: &str) -> String {
    let without_hidden = INVISIBLE_BLOCKS.replace_all(html, " ");
    let with_breaks = BLOCK_BOUNDARY.replace_all(&without_hidden, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = ENTITY.replace_all(&stripped, |caps: &Captures| decode_entity(&caps[0], &caps[1]));
    sanitize_extracted_text(&decoded)
}

fn decode_entity(raw: &str, name: &str) -> String {
    let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            "ndash" => Some('\u{2013}'),
            "mdash" => Some('\u{2014}'),
            "hellip" => Some('\u{2026}'),
            "rsquo" => Some('\u{2019}'),
            "lsquo" => Some('\u{2018}'),
            "rdquo" => Some('\u{201D}'),
            "ldquo" => Some('\u{201C}'),
            _ => None,
        }
    };

    decoded.map_or_else(|| raw.to_string(), String::from)
}

pub struct HtmlAdapter;

#[async_trait]
impl FileLoader for HtmlAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Html {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let html = String::from_utf8_lossy(data);
        let text = html_to_text(&html);

        if text.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(text)
    }
}
