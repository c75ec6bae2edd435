//! HTML parsers for AnimeSub.info pages.
//!
//! - [`CatalogParser`] resolves a title to its search link via `katalog.php`
//! - [`SearchResultsParser`] turns a result page into [`Subtitles`](crate::Subtitles)
//!
//! The site serves ISO-8859-2; use [`decode_page`] before parsing raw bytes.

mod catalog;
mod search_results;

pub use catalog::CatalogParser;
pub use search_results::{SearchPage, SearchResultsParser};

use encoding_rs::{Encoding, ISO_8859_2};
use scraper::{ElementRef, Node, Selector};

use crate::utils::collapse_whitespace;

/// Decodes a page body to text.
///
/// Uses the `charset` from the `Content-Type` header when it names a known
/// encoding, otherwise ISO-8859-2. A byte order mark overrides both.
#[must_use]
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(ISO_8859_2);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Parses a CSS selector literal known to be valid at build time.
///
/// # Panics
///
/// Panics if `selector` is invalid. Only used with literals covered by tests.
pub(crate) fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}

/// Text content of an element with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text content keeping `<br>` line breaks; each line is trimmed.
pub(crate) fn multiline_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push('\n'),
            _ => {}
        }
    }
    raw.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Direct `<td>` children of a row.
pub(crate) fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}
