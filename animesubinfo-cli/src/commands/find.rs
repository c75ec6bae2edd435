//! Find command handler: best subtitle for a video file, without downloading.

use anyhow::Result;
use animesubinfo::ParsedFilename;

use super::release_name;
use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::progress::with_spinner;
use crate::cli::FindArgs;
use crate::output;

pub async fn run_find_command(args: &FindArgs, ctx: &RunContext) -> Result<ProcessExit> {
    let name = release_name(&args.file)?;
    let best = with_spinner(
        ctx.use_spinner,
        format!("Looking up {name}..."),
        ctx.client.find_best_subtitles(ParsedFilename::parse(name)),
    )
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&best)?);
        return Ok(ProcessExit::Success);
    }
    match best {
        Some(subtitles) => {
            println!("Best match for {name}:");
            output::print_subtitles_table(std::slice::from_ref(&subtitles));
        }
        None => println!("No matching subtitle found"),
    }
    Ok(ProcessExit::Success)
}
