//! Tiered scoring of subtitles against a parsed release name.
//!
//! A score packs four tiers into one integer so that plain `>` ordering
//! respects tier priority:
//!
//! ```text
//! bits 8..  title similarity (0-100) + 1
//! bits 5-7  tier 2: checksum, file name, source (0-3)
//! bit  4    tier 3: release group (0-1)
//! bits 0-3  tier 4: year, season, type, video, resolution, audio (0-6)
//! ```
//!
//! A score of `0` means the subtitle cannot belong to the file at all.

use std::path::Path;

use chrono::Datelike;

use crate::constants::TITLE_SIMILARITY_THRESHOLD;
use crate::filename::ParsedFilename;
use crate::models::Subtitles;
use crate::normalize::{normalize, similarity};

/// The parts of a subtitle that fitness scoring looks at.
///
/// Search results build one from [`Subtitles`]; archive extraction builds
/// one per archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitnessCandidate<'a> {
    /// Titles to compare against; empty strings are ignored.
    pub titles: Vec<&'a str>,
    pub episode: u32,
    pub to_episode: u32,
    /// Free text searched for release details.
    pub description: &'a str,
    /// Upload year, when known.
    pub year: Option<i32>,
}

impl FitnessCandidate<'_> {
    fn is_movie(&self) -> bool {
        self.episode == 0 && self.to_episode == 0
    }
}

impl<'a> From<&'a Subtitles> for FitnessCandidate<'a> {
    fn from(subtitles: &'a Subtitles) -> Self {
        Self {
            titles: subtitles.titles().collect(),
            episode: subtitles.episode,
            to_episode: subtitles.to_episode,
            description: &subtitles.description,
            year: Some(subtitles.date.year()),
        }
    }
}

impl Subtitles {
    /// Scores how well this subtitle fits the given release.
    ///
    /// Returns `0` when the subtitle cannot match (wrong episode, movie vs
    /// series mismatch, title similarity below 60).
    #[must_use]
    pub fn calculate_fitness(&self, parsed: &ParsedFilename) -> u32 {
        score_candidate(&FitnessCandidate::from(self), parsed)
    }
}

/// Scores a candidate against a parsed release name.
#[must_use]
pub fn score_candidate(candidate: &FitnessCandidate<'_>, parsed: &ParsedFilename) -> u32 {
    let Some(anime_title) = parsed
        .anime_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    else {
        return 0;
    };

    match parsed.episode_number.as_deref() {
        Some(raw) => {
            let Ok(episode) = raw.trim().parse::<u32>() else {
                return 0;
            };
            if candidate.is_movie()
                || episode < candidate.episode
                || episode > candidate.to_episode
            {
                return 0;
            }
        }
        None if !candidate.is_movie() => return 0,
        None => {}
    }

    let Some(best) = candidate
        .titles
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| similarity(anime_title, t))
        .reduce(f64::max)
    else {
        return 0;
    };
    if best < TITLE_SIMILARITY_THRESHOLD {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let title_score = (best * 100.0).round() as u32;

    let description = normalize(candidate.description);
    let mentions = |value: &str| {
        let needle = normalize(value);
        !needle.is_empty() && description.contains(&needle)
    };
    let mentions_any = |values: &[String]| values.iter().any(|v| mentions(v));

    let tier2 = u32::from(mentions_any(&parsed.file_checksum))
        + u32::from(
            parsed
                .file_name
                .as_deref()
                .and_then(|name| Path::new(name).file_stem())
                .and_then(|stem| stem.to_str())
                .is_some_and(mentions),
        )
        + u32::from(mentions_any(&parsed.source));

    let tier3 = u32::from(mentions_any(&parsed.release_group));

    let year_matches = parsed
        .anime_year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .is_some_and(|year| {
            candidate.year.is_some_and(|y| y.to_string() == year)
                || candidate.titles.iter().any(|t| t.contains(year))
        });
    let season_matches = parsed
        .anime_season
        .as_deref()
        .and_then(season_number)
        .is_some_and(|n| {
            description.contains(&format!("season{n}")) || description.contains(&format!("s{n}"))
        });
    let tier4 = u32::from(year_matches)
        + u32::from(season_matches)
        + u32::from(parsed.anime_type.as_deref().is_some_and(mentions))
        + u32::from(mentions_any(&parsed.video_term))
        + u32::from(parsed.video_resolution.as_deref().is_some_and(mentions))
        + u32::from(mentions_any(&parsed.audio_term));

    ((title_score + 1) << 8) | (tier2 << 5) | (tier3 << 4) | tier4
}

/// Digits of a season value (`"S02"` -> `2`).
fn season_number(season: &str) -> Option<u32> {
    let digits: String = season.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::SubtitlesRating;

    fn subtitle(episode: u32, to_episode: u32, description: &str, year: i32) -> Subtitles {
        Subtitles {
            id: 1,
            episode,
            to_episode,
            original_title: "Kimetsu no Yaiba".to_string(),
            english_title: "Demon Slayer".to_string(),
            alt_title: "Pogromca demonów".to_string(),
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            format: "srt".to_string(),
            author: "test_author".to_string(),
            added_by: "test_user".to_string(),
            size: "100KB".to_string(),
            description: description.to_string(),
            comment_count: 0,
            downloaded_times: 0,
            rating: SubtitlesRating::default(),
        }
    }

    fn parsed(title: &str, episode: Option<&str>) -> ParsedFilename {
        ParsedFilename {
            anime_title: Some(title.to_string()),
            episode_number: episode.map(str::to_string),
            ..ParsedFilename::default()
        }
    }

    fn title_score(score: u32) -> u32 {
        (score >> 8) - 1
    }

    fn tier2(score: u32) -> u32 {
        (score >> 5) & 0b111
    }

    fn tier3(score: u32) -> u32 {
        (score >> 4) & 0b1
    }

    fn tier4(score: u32) -> u32 {
        score & 0b1111
    }

    #[test]
    fn test_episode_outside_range_scores_zero() {
        let sub = subtitle(10, 15, "", 2019);
        assert_eq!(sub.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("9"))), 0);
        assert_eq!(sub.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("16"))), 0);
        assert!(sub.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("10"))) > 0);
        assert!(sub.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("15"))) > 0);
    }

    #[test]
    fn test_movie_and_series_must_agree() {
        let movie = subtitle(0, 0, "", 2019);
        assert!(movie.calculate_fitness(&parsed("Kimetsu no Yaiba", None)) > 0);
        assert_eq!(movie.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("1"))), 0);

        let episode = subtitle(1, 1, "", 2019);
        assert_eq!(episode.calculate_fitness(&parsed("Kimetsu no Yaiba", None)), 0);
    }

    #[test]
    fn test_invalid_episode_and_empty_title_score_zero() {
        let sub = subtitle(1, 1, "", 2019);
        assert_eq!(
            sub.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("not_a_number"))),
            0
        );
        assert_eq!(sub.calculate_fitness(&parsed("", Some("1"))), 0);
        assert_eq!(sub.calculate_fitness(&ParsedFilename::default()), 0);
    }

    #[test]
    fn test_title_similarity_threshold() {
        let sub = subtitle(1, 1, "", 2019);
        assert_eq!(sub.calculate_fitness(&parsed("Attack on Titan", Some("1"))), 0);

        let mut all_empty = subtitle(1, 1, "", 2019);
        all_empty.original_title.clear();
        all_empty.english_title.clear();
        all_empty.alt_title.clear();
        assert_eq!(
            all_empty.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("1"))),
            0
        );
    }

    #[test]
    fn test_title_score_uses_best_title() {
        let sub = subtitle(1, 1, "", 2019);
        for title in ["Kimetsu no Yaiba", "Demon Slayer", "Pogromca demonów", "KIMETSU NO YAIBA"] {
            let score = sub.calculate_fitness(&parsed(title, Some("1")));
            assert_eq!(title_score(score), 100, "title {title}");
        }

        let mut partial = subtitle(1, 1, "", 2019);
        partial.original_title = "Kimetsu no Yaiba Season 2".to_string();
        partial.english_title.clear();
        let score = partial.calculate_fitness(&parsed("Kimetsu no Yaiba", Some("1")));
        assert!((60..100).contains(&title_score(score)), "score {score}");
    }

    #[test]
    fn test_bare_title_reaches_threshold() {
        let mut sub = subtitle(1, 1, "", 2019);
        sub.original_title = "Higurashi no Naku Koro ni".to_string();
        sub.english_title = "When They Cry".to_string();
        sub.alt_title.clear();
        let score = sub.calculate_fitness(&parsed("Higurashi", Some("1")));
        assert_eq!(title_score(score), 60);
    }

    #[test]
    fn test_tier2_counts_checksum_file_name_and_source() {
        let sub = subtitle(1, 1, "BluRay my_anime_file ABCD1234", 2019);
        let mut release = parsed("Kimetsu no Yaiba", Some("1"));
        assert_eq!(tier2(sub.calculate_fitness(&release)), 0);

        release.file_checksum = vec!["FFFF0000".to_string(), "ABCD1234".to_string()];
        assert_eq!(tier2(sub.calculate_fitness(&release)), 1);

        release.source = vec!["BluRay".to_string()];
        assert_eq!(tier2(sub.calculate_fitness(&release)), 2);

        release.file_name = Some("my_anime_file.mkv".to_string());
        assert_eq!(tier2(sub.calculate_fitness(&release)), 3);
    }

    #[test]
    fn test_tier3_release_group_is_normalized() {
        let mut release = parsed("Kimetsu no Yaiba", Some("1"));
        release.release_group = vec!["subsplease".to_string()];

        let sub = subtitle(1, 1, "Release: SubsPlease!!!", 2019);
        assert_eq!(tier3(sub.calculate_fitness(&release)), 1);

        let sub = subtitle(1, 1, "Generic description", 2019);
        assert_eq!(tier3(sub.calculate_fitness(&release)), 0);
    }

    #[test]
    fn test_tier4_counts_all_six_details() {
        let mut release = parsed("Kimetsu no Yaiba", Some("1"));
        release.anime_year = Some("2019".to_string());
        release.anime_season = Some("2".to_string());
        release.anime_type = Some("TV".to_string());
        release.video_term = vec!["H264".to_string()];
        release.video_resolution = Some("1080p".to_string());
        release.audio_term = vec!["AAC".to_string()];

        let sub = subtitle(1, 1, "2019 Season 2 TV H264 1080p AAC", 2019);
        assert_eq!(tier4(sub.calculate_fitness(&release)), 6);

        let sub = subtitle(1, 1, "Generic description", 2020);
        assert_eq!(tier4(sub.calculate_fitness(&release)), 0);
    }

    #[test]
    fn test_year_can_match_through_title() {
        let mut sub = subtitle(1, 1, "", 2020);
        sub.original_title = "Kimetsu no Yaiba (2019)".to_string();
        let mut release = parsed("Kimetsu no Yaiba", Some("1"));
        release.anime_year = Some("2019".to_string());
        assert_eq!(tier4(sub.calculate_fitness(&release)), 1);
    }

    #[test]
    fn test_season_prefix_form_matches() {
        let sub = subtitle(1, 1, "Wersja S2", 2019);
        let mut release = parsed("Kimetsu no Yaiba", Some("1"));
        release.anime_season = Some("S02".to_string());
        assert_eq!(tier4(sub.calculate_fitness(&release)), 1);
    }

    #[test]
    fn test_higher_tiers_dominate() {
        let release = ParsedFilename {
            source: vec!["BluRay".to_string()],
            release_group: vec!["SubsPlease".to_string()],
            video_resolution: Some("1080p".to_string()),
            ..parsed("Kimetsu no Yaiba", Some("1"))
        };
        let baseline = subtitle(1, 1, "", 2019).calculate_fitness(&release);
        let with_tier4 = subtitle(1, 1, "1080p", 2019).calculate_fitness(&release);
        let with_tier3 = subtitle(1, 1, "SubsPlease", 2019).calculate_fitness(&release);
        let with_tier2 = subtitle(1, 1, "BluRay", 2019).calculate_fitness(&release);
        assert!(with_tier2 > with_tier3);
        assert!(with_tier3 > with_tier4);
        assert!(with_tier4 > baseline);
    }

    #[test]
    fn test_parsed_release_name_scores_all_tiers() {
        let sub = subtitle(1, 1, "ABCD1234 SubsPlease 1080p", 2019);
        let release =
            ParsedFilename::parse("[SubsPlease] Kimetsu no Yaiba - 01 (1080p) [ABCD1234].mkv");
        let score = sub.calculate_fitness(&release);
        assert_eq!(title_score(score), 100);
        assert!(tier2(score) >= 1);
        assert_eq!(tier3(score), 1);
        assert!(tier4(score) >= 1);
    }

    #[test]
    fn test_score_candidate_without_year() {
        let candidate = FitnessCandidate {
            titles: vec!["GTO"],
            episode: 5,
            to_episode: 5,
            description: "GTO - 05 [DVDRip 768x576 x264 AC3].ass",
            year: None,
        };
        let release = ParsedFilename::parse("[SubGroup] GTO - 05 [1080p].mkv");
        assert!(score_candidate(&candidate, &release) > 0);

        let release = ParsedFilename::parse("[SubGroup] GTO - 06 [1080p].mkv");
        assert_eq!(score_candidate(&candidate, &release), 0);
    }
}
