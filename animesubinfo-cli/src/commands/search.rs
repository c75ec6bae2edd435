//! Search command handler: list subtitles for a title.

use anyhow::Result;
use animesubinfo::SearchQuery;

use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::progress::with_spinner;
use crate::cli::SearchArgs;
use crate::output;

pub async fn run_search_command(args: &SearchArgs, ctx: &RunContext) -> Result<ProcessExit> {
    let mut query = SearchQuery::new(&args.title)
        .sort_by(args.sort)
        .title_type(args.title_type);
    if let Some(limit) = args.limit.or(ctx.page_limit) {
        query = query.page_limit(limit);
    }

    let results = with_spinner(
        ctx.use_spinner,
        format!("Searching for {}...", args.title),
        ctx.client.search(&query),
    )
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No results found");
    } else {
        output::print_subtitles_table(&results);
        println!();
        println!("Found {} subtitle(s)", results.len());
    }
    Ok(ProcessExit::Success)
}
