use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::ProcessExit;
use crate::app::{command_dispatcher, config_runtime, context, terminal};
use crate::app_config;
use crate::cli::Cli;

pub(crate) async fn run() -> Result<ProcessExit> {
    let cli = Cli::parse();

    let loaded = app_config::load_default_file_config()?;
    let file_config = loaded.config.as_ref();

    let default_level = config_runtime::resolve_default_log_level(&cli, file_config);
    let dumb_terminal = terminal::is_dumb_terminal();
    let no_color = terminal::should_disable_color(terminal::no_color_env_requested(), dumb_terminal);
    terminal::init_tracing(default_level, no_color);

    debug!(?cli, "CLI arguments parsed");
    if let Some(path) = loaded.path.as_deref().filter(|_| file_config.is_some()) {
        debug!(path = %path.display(), "loaded config file");
    }

    let settings = config_runtime::ClientSettings::from_file_config(file_config);
    let ctx = context::RunContext {
        client: settings.build_client()?,
        page_limit: file_config.and_then(|c| c.page_limit),
        use_spinner: terminal::should_use_spinner(
            io::stderr().is_terminal(),
            config_runtime::is_quiet(&cli, file_config),
            dumb_terminal,
        ),
    };

    command_dispatcher::dispatch(&cli.command, &ctx).await
}
