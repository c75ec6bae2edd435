//! Picking the right file out of a subtitle archive.
//!
//! Episode packs ship one file per episode; the entry whose name best fits
//! the release is returned.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::constants::MAX_ENTRY_SIZE;
use crate::error::AnimeSubError;
use crate::filename::ParsedFilename;
use crate::fitness::{FitnessCandidate, score_candidate};
use crate::models::ExtractedSubtitle;

/// Extracts the archive entry that best fits `release`.
///
/// A single-file archive returns that file. Otherwise every entry name is
/// scored like a search result; when nothing scores, the first file wins.
///
/// # Errors
///
/// - [`AnimeSubError::Archive`] if `bytes` is not a readable ZIP archive
/// - [`AnimeSubError::EmptyArchive`] if it holds no files
/// - [`AnimeSubError::EntryTooLarge`] if the chosen entry inflates past 32 MiB
pub fn extract_best_entry(
    bytes: &[u8],
    release: &ParsedFilename,
) -> Result<ExtractedSubtitle, AnimeSubError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut names = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_file() {
            names.push((index, entry.name().to_string()));
        }
    }
    debug!(entries = names.len(), "reading subtitle archive");

    let Some((first_index, _)) = names.first() else {
        return Err(AnimeSubError::EmptyArchive);
    };
    let mut chosen = *first_index;

    if names.len() > 1 {
        let mut best_score = 0;
        for (index, name) in &names {
            let score = score_entry(name, release);
            if score > best_score {
                best_score = score;
                chosen = *index;
            }
        }
        debug!(chosen, best_score, "scored archive entries");
    }

    let entry = archive.by_index(chosen)?;
    let filename = entry.name().to_string();
    let content = read_capped(entry, &filename, MAX_ENTRY_SIZE)?;

    Ok(ExtractedSubtitle { filename, content })
}

/// Reads at most `limit` bytes; the header's declared size is not trusted.
fn read_capped(reader: impl Read, name: &str, limit: u64) -> Result<Vec<u8>, AnimeSubError> {
    let mut content = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut content)
        .map_err(|e| AnimeSubError::io(name, e))?;
    if content.len() as u64 > limit {
        return Err(AnimeSubError::EntryTooLarge {
            name: name.to_string(),
            limit,
        });
    }
    Ok(content)
}

fn score_entry(name: &str, release: &ParsedFilename) -> u32 {
    let entry = ParsedFilename::parse(name);
    let episode = entry
        .episode_number
        .as_deref()
        .and_then(|e| e.trim().parse().ok())
        .unwrap_or(0);
    let candidate = FitnessCandidate {
        titles: entry.anime_title.as_deref().into_iter().collect(),
        episode,
        to_episode: episode,
        description: name,
        year: None,
    };
    score_candidate(&candidate, release)
}
