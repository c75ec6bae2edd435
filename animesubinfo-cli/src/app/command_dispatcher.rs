//! CLI command routing.

use anyhow::Result;

use crate::app::context::RunContext;
use crate::cli::Command;
use crate::{ProcessExit, commands};

/// Runs the selected subcommand and returns the exit outcome.
pub(crate) async fn dispatch(command: &Command, ctx: &RunContext) -> Result<ProcessExit> {
    match command {
        Command::Search(args) => commands::run_search_command(args, ctx).await,
        Command::Find(args) => commands::run_find_command(args, ctx).await,
        Command::Download(args) => commands::run_download_command(args, ctx).await,
        Command::Best(args) => commands::run_best_command(args, ctx).await,
    }
}
