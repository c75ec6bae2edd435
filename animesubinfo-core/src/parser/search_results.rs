//! Search result pages (`szukaj.php`, `szukaj_old.php`).
//!
//! Each subtitle is rendered as a `table.Napisy` with four rows:
//!
//! 1. original title + episode marker, date, format, size
//! 2. English title, author, download count
//! 3. alternative title, uploader, comment count, rating
//! 4. download form (`id`, `sh`) and description

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{compile_static_selector, element_text, multiline_text, row_cells};
use crate::models::{Subtitles, SubtitlesRating};
use crate::utils::compile_static_regex;

static RESULT_TABLE: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("table.Napisy"));
static ROW: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("tr"));
static ID_INPUT: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(r#"input[name="id"]"#));
static SH_INPUT: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(r#"input[name="sh"]"#));
static FORM: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("form"));
static LINK: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a[href]"));

static EPISODE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)^(.*?)\s*\bep\s*(\d+)(?:\s*-\s*(\d+))?$")
});
static DOWNLOADS_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(\d+)\s*razy"));
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\d+"));
static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(\d+)\s*%"));
static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"[?&]od=(\d+)"));

/// Everything extracted from one search result page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Subtitles in page order.
    pub subtitles: Vec<Subtitles>,
    /// Total pages for the query; `0` on an empty result page.
    pub number_of_pages: u32,
    /// `sh` download token per subtitle id.
    pub session_tokens: HashMap<u32, String>,
}

impl SearchPage {
    /// Download token for a subtitle listed on this page.
    #[must_use]
    pub fn sh_for(&self, id: u32) -> Option<&str> {
        self.session_tokens.get(&id).map(String::as_str)
    }
}

/// Parser for search result pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResultsParser;

impl SearchResultsParser {
    /// Parses a decoded search result page. Malformed result tables are
    /// skipped.
    #[must_use]
    pub fn parse(html: &str) -> SearchPage {
        let document = Html::parse_document(html);
        let mut page = SearchPage::default();

        for table in document.select(&RESULT_TABLE) {
            match parse_table(table) {
                Some((subtitles, sh)) => {
                    if let Some(sh) = sh {
                        page.session_tokens.insert(subtitles.id, sh);
                    }
                    page.subtitles.push(subtitles);
                }
                None => debug!("skipping malformed result table"),
            }
        }

        let last_page = document
            .select(&LINK)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| PAGE_RE.captures(href))
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max();
        page.number_of_pages = match last_page {
            Some(index) => index.saturating_add(1),
            None if page.subtitles.is_empty() => 0,
            None => 1,
        };

        debug!(
            results = page.subtitles.len(),
            pages = page.number_of_pages,
            "parsed search results page"
        );
        page
    }
}

fn parse_table(table: ElementRef<'_>) -> Option<(Subtitles, Option<String>)> {
    let rows: Vec<ElementRef<'_>> = table
        .select(&ROW)
        .filter(|row| owning_table(*row).is_some_and(|t| t.id() == table.id()))
        .collect();
    if rows.len() < 4 {
        debug!(rows = rows.len(), "result table has too few rows");
        return None;
    }

    let first = row_cells(rows[0]);
    let second = row_cells(rows[1]);
    let third = row_cells(rows[2]);

    let (original_title, episode, to_episode) = split_episode_marker(&element_text(*first.first()?));
    let date_text = element_text(*first.get(1)?);
    let Ok(date) = NaiveDate::parse_from_str(&date_text, "%Y.%m.%d") else {
        debug!(date = %date_text, "unparseable result date");
        return None;
    };

    let id_text = rows[3]
        .select(&ID_INPUT)
        .next()
        .and_then(|input| input.value().attr("value"))?;
    let Ok(id) = id_text.trim().parse::<u32>() else {
        debug!(id = %id_text, "unparseable subtitle id");
        return None;
    };
    let sh = rows[3]
        .select(&SH_INPUT)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let description = row_cells(rows[3])
        .into_iter()
        .filter(|cell| cell.select(&FORM).next().is_none())
        .last()
        .map(multiline_text)
        .unwrap_or_default();

    let downloaded_times = second
        .iter()
        .find_map(|cell| {
            DOWNLOADS_RE
                .captures(&element_text(*cell))
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(0);

    let subtitles = Subtitles {
        id,
        episode,
        to_episode,
        original_title,
        english_title: cell_text(&second, 0),
        alt_title: cell_text(&third, 0),
        date,
        format: cell_text(&first, 2),
        author: cell_text(&second, 1).trim_start_matches('~').trim().to_string(),
        added_by: cell_text(&third, 1),
        size: cell_text(&first, 3),
        description,
        comment_count: third
            .get(2)
            .and_then(|cell| first_number(&element_text(*cell)))
            .unwrap_or(0),
        downloaded_times,
        rating: third
            .get(3)
            .map(|cell| parse_rating(&element_text(*cell)))
            .unwrap_or_default(),
    };
    Some((subtitles, sh))
}

fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

fn cell_text(cells: &[ElementRef<'_>], index: usize) -> String {
    cells.get(index).map(|c| element_text(*c)).unwrap_or_default()
}

/// Splits `"Title ep01-09"` into the title and the episode range.
/// No marker means a movie (`0..0`).
fn split_episode_marker(text: &str) -> (String, u32, u32) {
    let Some(caps) = EPISODE_MARKER_RE.captures(text) else {
        return (text.to_string(), 0, 0);
    };
    let from = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let to = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(from);
    let title = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    (title, from, to)
}

fn first_number(text: &str) -> Option<u32> {
    NUMBER_RE.find(text)?.as_str().parse().ok()
}

/// Reads the bad / average / very good percentages, in that order.
fn parse_rating(text: &str) -> SubtitlesRating {
    let values: Vec<u8> = PERCENT_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    match values.as_slice() {
        [bad, average, very_good, ..] => SubtitlesRating {
            bad: *bad,
            average: *average,
            very_good: *very_good,
        },
        _ => SubtitlesRating::default(),
    }
}
