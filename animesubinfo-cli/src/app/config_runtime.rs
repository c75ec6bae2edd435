use anyhow::{Context, Result};
use animesubinfo::{AnimeSubClient, CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, READ_TIMEOUT_SECS};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Cli;

/// Client settings after merging the config file over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientSettings {
    pub(crate) base_url: String,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) read_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    pub(crate) fn from_file_config(file_config: Option<&FileConfig>) -> Self {
        let mut settings = Self::default();
        let Some(file_config) = file_config else {
            return settings;
        };
        if let Some(base_url) = &file_config.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(secs) = file_config.connect_timeout_secs {
            settings.connect_timeout_secs = secs;
        }
        if let Some(secs) = file_config.read_timeout_secs {
            settings.read_timeout_secs = secs;
        }
        settings
    }

    pub(crate) fn build_client(&self) -> Result<AnimeSubClient> {
        AnimeSubClient::builder()
            .base_url(&self.base_url)
            .connect_timeout_secs(self.connect_timeout_secs)
            .read_timeout_secs(self.read_timeout_secs)
            .build()
            .with_context(|| format!("Failed to create client for {}", self.base_url))
    }
}

/// Whether the effective verbosity is quiet.
pub(crate) fn is_quiet(cli: &Cli, file_config: Option<&FileConfig>) -> bool {
    cli.quiet
        || (cli.verbose == 0
            && file_config.and_then(|c| c.verbosity) == Some(VerbositySetting::Quiet))
}

/// Log level from `-v/-q`, falling back to the config file verbosity.
pub(crate) fn resolve_default_log_level(
    cli: &Cli,
    file_config: Option<&FileConfig>,
) -> &'static str {
    if cli.quiet {
        return "error";
    }
    match cli.verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match file_config.and_then(|c| c.verbosity) {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "debug",
        Some(VerbositySetting::Debug) => "trace",
        Some(VerbositySetting::Default) | None => "info",
    }
}
