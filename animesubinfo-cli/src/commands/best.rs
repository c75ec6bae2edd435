//! Best command handler: find, download and extract the subtitle for a video.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use animesubinfo::ParsedFilename;
use tracing::debug;

use super::release_name;
use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::progress::with_spinner;
use crate::cli::BestArgs;

/// Used when the archive entry has no extension.
const FALLBACK_EXTENSION: &str = "srt";

pub async fn run_best_command(args: &BestArgs, ctx: &RunContext) -> Result<ProcessExit> {
    let name = release_name(&args.file)?;
    let parsed = ParsedFilename::parse(name);

    let best = with_spinner(
        ctx.use_spinner,
        format!("Looking up {name}..."),
        ctx.client.find_best_subtitles(parsed.clone()),
    )
    .await?;
    let Some(subtitles) = best else {
        println!("No matching subtitle found");
        return Ok(ProcessExit::Failure);
    };
    println!("Subtitle ID: {}", subtitles.id);

    let extracted = with_spinner(
        ctx.use_spinner,
        format!("Downloading subtitle {}...", subtitles.id),
        ctx.client.download_and_extract_subtitle(parsed, subtitles.id),
    )
    .await?;
    debug!(entry = %extracted.filename, "extracted subtitle");

    let target = subtitle_path(&args.file, &extracted.filename);
    tokio::fs::write(&target, &extracted.content)
        .await
        .with_context(|| format!("Failed to write '{}'", target.display()))?;

    println!("Saved: {}", target.display());
    Ok(ProcessExit::Success)
}

/// `<video dir>/<video stem>.<subtitle extension>`.
fn subtitle_path(video: &Path, entry_name: &str) -> PathBuf {
    let extension = Path::new(entry_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(FALLBACK_EXTENSION);
    video.with_extension(extension)
}
