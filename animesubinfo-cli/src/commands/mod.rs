//! CLI command handlers.

mod best;
mod download;
mod find;
mod search;

use std::path::Path;

use anyhow::{Result, anyhow};

pub use best::run_best_command;
pub use download::run_download_command;
pub use find::run_find_command;
pub use search::run_search_command;

/// File name part of a video path; only the name is used for matching.
fn release_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))
}
