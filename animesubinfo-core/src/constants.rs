//! Site endpoints and HTTP defaults.

/// Public AnimeSub.info address. The site does not serve HTTPS.
pub const DEFAULT_BASE_URL: &str = "http://animesub.info";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (2 minutes; archives are small).
pub const READ_TIMEOUT_SECS: u64 = 120;

pub(crate) const SEARCH_PATH: &str = "szukaj.php";
pub(crate) const CATALOG_PATH: &str = "katalog.php";
pub(crate) const DOWNLOAD_PATH: &str = "sciagnij.php";

/// Cookie the site sets on search pages and expects back on download.
pub(crate) const SESSION_COOKIE: &str = "ansi_sciagnij";

/// Minimum title similarity for catalog fuzzy matching and fitness scoring.
pub(crate) const TITLE_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Largest archive entry that is decompressed (32 MiB). Subtitle files are
/// a few hundred KiB at most.
pub(crate) const MAX_ENTRY_SIZE: u64 = 32 * 1024 * 1024;
