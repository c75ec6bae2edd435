use std::path::PathBuf;

use anyhow::Result;

use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::progress::with_spinner;
use crate::cli::DownloadArgs;

pub async fn run_download_command(args: &DownloadArgs, ctx: &RunContext) -> Result<ProcessExit> {
    let id = args.subtitle_id;
    let saved = with_spinner(ctx.use_spinner, format!("Downloading subtitle {id}..."), async {
        let archive = ctx.client.download_subtitles(id).await?;
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&archive.filename));
        archive.save_to(&path).await?;
        anyhow::Ok(path)
    })
    .await?;

    println!("Downloaded: {}", saved.display());
    Ok(ProcessExit::Success)
}
