//! Shared state handed to command handlers.

use animesubinfo::AnimeSubClient;

pub(crate) struct RunContext {
    pub(crate) client: AnimeSubClient,
    /// Page limit from the config file; `--limit` takes precedence.
    pub(crate) page_limit: Option<u32>,
    pub(crate) use_spinner: bool,
}
