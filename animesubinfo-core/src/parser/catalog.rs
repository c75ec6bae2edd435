//! Catalog page (`katalog.php?S=<letter>`) lookup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{compile_static_selector, element_text, row_cells};
use crate::constants::TITLE_SIMILARITY_THRESHOLD;
use crate::normalize::{normalize, similarity};

static SEARCH_LINK: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(r#"a[href*="szukaj_old.php"]"#));

/// One catalog entry: the search link plus every title shown for it.
#[derive(Debug)]
struct CatalogEntry {
    link: String,
    titles: Vec<String>,
    normalized: Vec<String>,
}

/// Finds the catalog entry for an anime title.
///
/// Exact matches on normalized title variants win (season and year variants
/// before the bare title). Otherwise the entry with the most similar title is
/// returned when its similarity reaches 0.6.
///
/// ```
/// use animesubinfo::CatalogParser;
///
/// let html = r#"<table><tr>
///   <td><a href="szukaj_old.php?pTitle=en&amp;szukane=Elf+Princess+Rane">Elf Princess Rane</a></td>
///   <td>Yousei Hime Ren</td>
/// </tr></table>"#;
///
/// let link = CatalogParser::new("Yousei Hime Ren").parse(html);
/// assert_eq!(link.as_deref(), Some("szukaj_old.php?pTitle=en&szukane=Elf+Princess+Rane"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogParser {
    title: String,
    season: Option<String>,
    year: Option<String>,
}

impl CatalogParser {
    /// Creates a parser looking for `title`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            season: None,
            year: None,
        }
    }

    /// Prefers entries naming this season (`"3"`, `"S03"`).
    #[must_use]
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Prefers entries naming this year.
    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Returns the relative search link of the matching entry, if any.
    #[must_use]
    pub fn parse(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let entries = collect_entries(&document);
        debug!(entries = entries.len(), title = %self.title, "parsed catalog page");
        if entries.is_empty() {
            return None;
        }

        for variant in self.variants() {
            if let Some(entry) = entries
                .iter()
                .find(|entry| entry.normalized.iter().any(|t| *t == variant))
            {
                debug!(%variant, link = %entry.link, "exact catalog match");
                return Some(entry.link.clone());
            }
        }

        let mut best: Option<(&CatalogEntry, f64)> = None;
        for entry in &entries {
            let score = entry
                .titles
                .iter()
                .map(|t| similarity(&self.title, t))
                .fold(0.0_f64, f64::max);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((entry, score));
            }
        }
        best.filter(|(_, score)| *score >= TITLE_SIMILARITY_THRESHOLD)
            .map(|(entry, score)| {
                debug!(link = %entry.link, score, "fuzzy catalog match");
                entry.link.clone()
            })
    }

    /// Normalized lookup keys, most specific first.
    fn variants(&self) -> Vec<String> {
        let base = normalize(&self.title);
        if base.is_empty() {
            return Vec::new();
        }
        let mut variants = Vec::new();
        if let Some(n) = self.season.as_deref().and_then(season_number) {
            variants.push(format!("{base}season{n}"));
            variants.push(format!("{base}s{n}"));
            variants.push(format!("{base}{n}"));
            variants.push(format!("{base}{}season", ordinal(n)));
        }
        if let Some(year) = self.year.as_deref().map(normalize).filter(|y| !y.is_empty()) {
            variants.push(format!("{base}{year}"));
        }
        variants.push(base);
        variants
    }
}

fn collect_entries(document: &Html) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for anchor in document.select(&SEARCH_LINK) {
        let Some(link) = anchor.value().attr("href") else {
            continue;
        };
        if !link.contains("szukane=") {
            continue;
        }

        let mut titles = vec![element_text(anchor)];
        if let Some(row) = enclosing_row(anchor) {
            for cell in row_cells(row) {
                let text = element_text(cell);
                if !text.is_empty() && !titles.contains(&text) {
                    titles.push(text);
                }
            }
        }
        titles.retain(|t| !t.is_empty());
        let normalized = titles.iter().map(|t| normalize(t)).collect();
        entries.push(CatalogEntry {
            link: link.trim().to_string(),
            titles,
            normalized,
        });
    }
    entries
}

fn enclosing_row(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "tr")
}

fn season_number(season: &str) -> Option<u32> {
    let digits: String = season.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
