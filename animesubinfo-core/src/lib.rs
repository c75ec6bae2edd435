//! AnimeSub.info Core Library
//!
//! This library provides search and download access to AnimeSub.info, a Polish
//! anime subtitle site, and matches its subtitles against anime release file
//! names.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`client`] - HTTP client for search, catalog lookup, and archive downloads
//! - [`parser`] - HTML parsers for catalog and search result pages
//! - [`filename`] - Release file name parsing (title, episode, group, ...)
//! - [`fitness`] - Tiered scoring of subtitles against a parsed file name
//! - [`archive`] - Picking the right subtitle out of a downloaded ZIP
//! - [`models`] - Subtitle records and search options
//! - [`normalize`] - Title normalization and similarity

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod client;
mod constants;
mod error;
pub mod filename;
pub mod fitness;
pub mod models;
pub mod normalize;
pub mod parser;
pub(crate) mod user_agent;
mod utils;

// Re-export commonly used types
pub use archive::extract_best_entry;
pub use client::{AnimeSubClient, AnimeSubClientBuilder, DownloadedArchive, SearchQuery};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, READ_TIMEOUT_SECS};
pub use error::AnimeSubError;
pub use filename::ParsedFilename;
pub use fitness::{FitnessCandidate, score_candidate};
pub use models::{
    ExtractedSubtitle, SessionData, SortBy, Subtitles, SubtitlesRating, TitleType,
    UnknownOptionError,
};
pub use normalize::{normalize, similarity};
pub use parser::{CatalogParser, SearchPage, SearchResultsParser, decode_page};
