//! Subtitle records and search options.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rating percentages shown next to each subtitle on the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitlesRating {
    /// Percentage of "bad" votes.
    pub bad: u8,
    /// Percentage of "average" votes.
    pub average: u8,
    /// Percentage of "very good" votes.
    pub very_good: u8,
}

/// One subtitle entry from a search result page.
///
/// `episode == to_episode == 0` marks a movie; `to_episode > episode` marks an
/// episode pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitles {
    pub id: u32,
    pub episode: u32,
    pub to_episode: u32,
    pub original_title: String,
    pub english_title: String,
    pub alt_title: String,
    /// Upload date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub format: String,
    pub author: String,
    pub added_by: String,
    pub size: String,
    pub description: String,
    pub comment_count: u32,
    pub downloaded_times: u32,
    pub rating: SubtitlesRating,
}

impl Subtitles {
    /// True when the entry has no episode marker.
    #[must_use]
    pub fn is_movie(&self) -> bool {
        self.episode == 0 && self.to_episode == 0
    }

    /// True when the entry covers a range of episodes.
    #[must_use]
    pub fn is_pack(&self) -> bool {
        self.to_episode > self.episode
    }

    /// Human-readable episode column: `Movie`, `1-12` or `3`.
    #[must_use]
    pub fn episode_label(&self) -> String {
        if self.is_movie() {
            "Movie".to_string()
        } else if self.is_pack() {
            format!("{}-{}", self.episode, self.to_episode)
        } else {
            self.episode.to_string()
        }
    }

    /// Titles in site order: original, English, alternative.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        [
            self.original_title.as_str(),
            self.english_title.as_str(),
            self.alt_title.as_str(),
        ]
        .into_iter()
    }
}

/// Error returned when a sort order or title type code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Result ordering accepted by the site's search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Relevance (`traf`).
    #[default]
    Fitness,
    /// Newest first (`datad`).
    AddedDate,
    /// Most downloaded first (`pobrn`).
    Downloads,
}

impl SortBy {
    /// Query code sent as `pSortuj`.
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Fitness => "traf",
            Self::AddedDate => "datad",
            Self::Downloads => "pobrn",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for SortBy {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traf" => Ok(Self::Fitness),
            "datad" => Ok(Self::AddedDate),
            "pobrn" => Ok(Self::Downloads),
            _ => Err(UnknownOptionError {
                kind: "sort order",
                value: s.to_string(),
                expected: "traf, datad, pobrn",
            }),
        }
    }
}

/// Which title column the site searches in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TitleType {
    /// Original (romaji) title (`org`).
    #[default]
    Original,
    /// English title (`en`).
    English,
    /// Alternative (Polish) title (`pl`).
    Alternative,
}

impl TitleType {
    /// Query code sent as `pTitle`.
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Original => "org",
            Self::English => "en",
            Self::Alternative => "pl",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for TitleType {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "org" => Ok(Self::Original),
            "en" => Ok(Self::English),
            "pl" => Ok(Self::Alternative),
            _ => Err(UnknownOptionError {
                kind: "title type",
                value: s.to_string(),
                expected: "org, en, pl",
            }),
        }
    }
}

/// Tokens required by the download form for one subtitle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// Per-subtitle hash from the search result form.
    pub sh: String,
    /// Value of the `ansi_sciagnij` cookie.
    pub ansi_cookie: String,
}

/// One file pulled out of a subtitle archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSubtitle {
    /// Entry name inside the archive.
    pub filename: String,
    pub content: Vec<u8>,
}
