//! Error types for AnimeSub.info operations.
//!
//! Every variant carries the context needed to act on it (URL, subtitle id,
//! path) so callers can report failures without extra bookkeeping.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to AnimeSub.info or handling archives.
#[derive(Debug, Error)]
pub enum AnimeSubError {
    /// Network-level error (DNS resolution, connection refused, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A URL could not be built from the base URL and a site link.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The `sh` token or session cookie for a subtitle could not be found.
    #[error("Could not obtain session data for subtitle {subtitle_id}")]
    SessionData {
        /// The subtitle that was requested.
        subtitle_id: u32,
    },

    /// The site answered the download form with an HTML page instead of a ZIP.
    #[error(
        "Security error downloading subtitle {subtitle_id}: the site returned an HTML page, session tokens may be invalid"
    )]
    Security {
        /// The subtitle that was requested.
        subtitle_id: u32,
        /// The `sh` token sent with the form.
        sh: String,
        /// The session cookie sent with the form.
        cookie: String,
    },

    /// The downloaded archive contains no files.
    #[error("Empty archive: no subtitle files found")]
    EmptyArchive,

    /// An archive entry decompresses to more than the allowed size.
    #[error("archive entry {name} exceeds {limit} bytes")]
    EntryTooLarge {
        /// Entry name inside the archive.
        name: String,
        /// The size cap in bytes.
        limit: u64,
    },

    /// The downloaded archive could not be read.
    #[error("invalid subtitle archive: {source}")]
    Archive {
        /// The underlying ZIP error.
        #[source]
        source: zip::result::ZipError,
    },

    /// File system error while saving or reading.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Building the HTTP client panicked, also with system proxy lookup disabled.
    #[error("HTTP client construction panicked while applying env-proxy fallback")]
    ClientBuildPanicked,
}

impl AnimeSubError {
    /// Creates a network error, promoting timeouts to [`AnimeSubError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a session data error.
    #[must_use]
    pub fn session_data(subtitle_id: u32) -> Self {
        Self::SessionData { subtitle_id }
    }

    /// Creates a security error carrying the rejected tokens.
    pub fn security(subtitle_id: u32, sh: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self::Security {
            subtitle_id,
            sh: sh.into(),
            cookie: cookie.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the HTTP status code if this is an HTTP status error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for AnimeSubError {
    fn from(source: zip::result::ZipError) -> Self {
        Self::Archive { source }
    }
}
