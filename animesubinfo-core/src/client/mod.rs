//! AnimeSub.info client.
//!
//! [`AnimeSubClient`] wraps the site's three endpoints:
//! - `szukaj.php` / `szukaj_old.php` - paged search results
//! - `katalog.php` - per-letter title catalog used to find a show's search link
//! - `sciagnij.php` - archive download, guarded by a per-subtitle `sh` token and
//!   the `ansi_sciagnij` session cookie
//!
//! Requests are sequential; a client is cheap to clone and reuses connections.

mod download;
mod http;

pub use download::DownloadedArchive;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use tracing::{debug, info, instrument};
use url::Url;

use crate::archive::extract_best_entry;
use crate::constants::{
    CATALOG_PATH, CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DOWNLOAD_PATH, READ_TIMEOUT_SECS,
    SEARCH_PATH, SESSION_COOKIE,
};
use crate::error::AnimeSubError;
use crate::filename::ParsedFilename;
use crate::models::{ExtractedSubtitle, SessionData, SortBy, Subtitles, TitleType};
use crate::parser::{CatalogParser, SearchPage, SearchResultsParser};

/// Parameters of a title search.
///
/// ```
/// use animesubinfo::{SearchQuery, SortBy, TitleType};
///
/// let query = SearchQuery::new("Yuru Camp")
///     .sort_by(SortBy::Downloads)
///     .title_type(TitleType::English)
///     .page_limit(2);
/// assert_eq!(query.title, "Yuru Camp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub sort_by: SortBy,
    pub title_type: TitleType,
    /// Maximum number of result pages to fetch; `None` fetches all.
    pub page_limit: Option<u32>,
}

impl SearchQuery {
    /// Query for `title` with site defaults (relevance, original title, all pages).
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sort_by: SortBy::default(),
            title_type: TitleType::default(),
            page_limit: None,
        }
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[must_use]
    pub fn title_type(mut self, title_type: TitleType) -> Self {
        self.title_type = title_type;
        self
    }

    /// Limits the number of pages fetched. Values below 1 are treated as 1.
    #[must_use]
    pub fn page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = Some(page_limit.max(1));
        self
    }
}

/// Builder for [`AnimeSubClient`].
#[derive(Debug, Clone)]
pub struct AnimeSubClientBuilder {
    base_url: String,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Default for AnimeSubClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl AnimeSubClientBuilder {
    /// Overrides the site address (mirrors, test servers).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn read_timeout_secs(mut self, secs: u64) -> Self {
        self.read_timeout_secs = secs;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeSubError::InvalidUrl`] for an unusable base URL and
    /// [`AnimeSubError::ClientBuild`] / [`AnimeSubError::ClientBuildPanicked`] if
    /// the HTTP client cannot be created.
    pub fn build(self) -> Result<AnimeSubClient, AnimeSubError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| AnimeSubError::invalid_url(&self.base_url))?;
        let http = http::build_http_client(self.connect_timeout_secs, self.read_timeout_secs)?;
        Ok(AnimeSubClient { http, base_url })
    }
}

/// Client for AnimeSub.info.
#[derive(Debug, Clone)]
pub struct AnimeSubClient {
    http: Client,
    base_url: Url,
}

impl AnimeSubClient {
    /// Creates a client for the public site with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeSubError::ClientBuild`] or
    /// [`AnimeSubError::ClientBuildPanicked`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self, AnimeSubError> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> AnimeSubClientBuilder {
        AnimeSubClientBuilder::default()
    }

    /// The site address requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Searches subtitles by title.
    ///
    /// Fetches the first page, then following pages up to the smaller of the
    /// site's page count and [`SearchQuery::page_limit`].
    ///
    /// # Errors
    ///
    /// Returns [`AnimeSubError::HttpStatus`] for error responses and
    /// [`AnimeSubError::Network`] / [`AnimeSubError::Timeout`] for transport
    /// failures.
    #[instrument(skip(self), fields(title = %query.title))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Subtitles>, AnimeSubError> {
        let mut url = self.endpoint(SEARCH_PATH)?;
        url.query_pairs_mut()
            .append_pair("szukane", &query.title)
            .append_pair("pTitle", query.title_type.as_code())
            .append_pair("pSortuj", query.sort_by.as_code());
        self.fetch_all_pages(&url, query.page_limit).await
    }

    /// Finds the subtitle that best fits a release file name.
    ///
    /// Looks the title up in the catalog, fetches every result page of the
    /// matching entry and returns the highest non-zero fitness score (earliest
    /// result wins ties). Returns `Ok(None)` without network access when the
    /// release has no title.
    ///
    /// # Errors
    ///
    /// Propagates HTTP and transport errors from the catalog and search
    /// requests.
    #[instrument(skip(self, release))]
    pub async fn find_best_subtitles(
        &self,
        release: impl Into<ParsedFilename>,
    ) -> Result<Option<Subtitles>, AnimeSubError> {
        let parsed = release.into();
        let Some(title) = parsed
            .anime_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            debug!("release has no title; skipping lookup");
            return Ok(None);
        };

        let mut catalog_url = self.endpoint(CATALOG_PATH)?;
        catalog_url
            .query_pairs_mut()
            .append_pair("S", &catalog_letter(title));
        let catalog = http::fetch_page(&self.http, catalog_url.as_str()).await?;

        let mut parser = CatalogParser::new(title);
        if let Some(season) = parsed.anime_season.as_deref() {
            parser = parser.with_season(season);
        }
        if let Some(year) = parsed.anime_year.as_deref() {
            parser = parser.with_year(year);
        }
        let Some(link) = parser.parse(&catalog.body) else {
            debug!(title, "no catalog entry");
            return Ok(None);
        };

        let search_url = self
            .base_url
            .join(&link)
            .map_err(|_| AnimeSubError::invalid_url(&link))?;
        let candidates = self.fetch_all_pages(&search_url, None).await?;

        let mut best: Option<(u32, &Subtitles)> = None;
        for subtitles in &candidates {
            let score = subtitles.calculate_fitness(&parsed);
            if score > 0 && best.is_none_or(|(current, _)| score > current) {
                best = Some((score, subtitles));
            }
        }
        if let Some((score, subtitles)) = best {
            debug!(id = subtitles.id, score, "best subtitle");
        }
        Ok(best.map(|(_, subtitles)| subtitles.clone()))
    }

    /// Fetches the download tokens for a subtitle.
    ///
    /// Returns `Ok(None)` when the site does not list the subtitle or does not
    /// set the session cookie.
    ///
    /// # Errors
    ///
    /// Propagates HTTP and transport errors.
    #[instrument(skip(self))]
    pub async fn session_data(&self, subtitle_id: u32) -> Result<Option<SessionData>, AnimeSubError> {
        let mut url = self.endpoint(SEARCH_PATH)?;
        url.query_pairs_mut()
            .append_pair("ID", &subtitle_id.to_string());
        let page = http::fetch_page(&self.http, url.as_str()).await?;

        let results = SearchResultsParser::parse(&page.body);
        let sh = results.sh_for(subtitle_id).map(str::to_string);
        match (sh, page.session_cookie) {
            (Some(sh), Some(ansi_cookie)) => Ok(Some(SessionData { sh, ansi_cookie })),
            (sh, cookie) => {
                debug!(
                    has_sh = sh.is_some(),
                    has_cookie = cookie.is_some(),
                    "incomplete session data"
                );
                Ok(None)
            }
        }
    }

    /// Starts downloading a subtitle archive.
    ///
    /// # Errors
    ///
    /// - [`AnimeSubError::SessionData`] when the download tokens are unavailable
    /// - [`AnimeSubError::HttpStatus`] for error responses
    /// - [`AnimeSubError::Security`] when the site answers with an HTML page
    ///   instead of the archive
    #[instrument(skip(self))]
    pub async fn download_subtitles(
        &self,
        subtitle_id: u32,
    ) -> Result<DownloadedArchive, AnimeSubError> {
        let session = self
            .session_data(subtitle_id)
            .await?
            .ok_or_else(|| AnimeSubError::session_data(subtitle_id))?;

        let url = self.endpoint(DOWNLOAD_PATH)?;
        let form = format!(
            "id={subtitle_id}&sh={}",
            urlencoding::encode(&session.sh)
        );
        let request = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(COOKIE, format!("{SESSION_COOKIE}={}", session.ansi_cookie))
            .body(form);
        let response = http::send(request, url.as_str()).await?;

        let is_html = http::header_str(&response, CONTENT_TYPE)
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("text/html"));
        if is_html {
            return Err(AnimeSubError::security(
                subtitle_id,
                session.sh,
                session.ansi_cookie,
            ));
        }

        let archive = DownloadedArchive::from_response(subtitle_id, url.as_str(), response);
        info!(
            subtitle_id,
            filename = %archive.filename,
            content_length = ?archive.content_length,
            "subtitle archive ready"
        );
        Ok(archive)
    }

    /// Downloads a subtitle archive and extracts the entry that best fits the
    /// release.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`download_subtitles`](Self::download_subtitles),
    /// plus [`AnimeSubError::EmptyArchive`] / [`AnimeSubError::Archive`] for
    /// unusable archives.
    #[instrument(skip(self, release))]
    pub async fn download_and_extract_subtitle(
        &self,
        release: impl Into<ParsedFilename>,
        subtitle_id: u32,
    ) -> Result<ExtractedSubtitle, AnimeSubError> {
        let parsed = release.into();
        let bytes = self.download_subtitles(subtitle_id).await?.bytes().await?;
        extract_best_entry(&bytes, &parsed)
    }

    async fn fetch_all_pages(
        &self,
        url: &Url,
        page_limit: Option<u32>,
    ) -> Result<Vec<Subtitles>, AnimeSubError> {
        let first = self.fetch_results_page(url, 0).await?;
        let total = first.number_of_pages;
        let last = page_limit.map_or(total, |limit| total.min(limit.max(1)));
        debug!(total, last, "search result pages");

        let mut subtitles = first.subtitles;
        for page in 1..last {
            subtitles.extend(self.fetch_results_page(url, page).await?.subtitles);
        }
        Ok(subtitles)
    }

    async fn fetch_results_page(&self, url: &Url, page: u32) -> Result<SearchPage, AnimeSubError> {
        let mut url = url.clone();
        if page > 0 {
            url.query_pairs_mut().append_pair("od", &page.to_string());
        }
        let fetched = http::fetch_page(&self.http, url.as_str()).await?;
        Ok(SearchResultsParser::parse(&fetched.body))
    }

    fn endpoint(&self, path: &str) -> Result<Url, AnimeSubError> {
        self.base_url
            .join(path)
            .map_err(|_| AnimeSubError::invalid_url(format!("{}{path}", self.base_url)))
    }
}

/// Catalog page key: the lower-case first letter, `0` for anything else.
fn catalog_letter(title: &str) -> String {
    match title.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => "0".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_letter() {
        assert_eq!(catalog_letter("Yuru Camp"), "y");
        assert_eq!(catalog_letter("elf"), "e");
        assert_eq!(catalog_letter("86 Eighty-Six"), "0");
        assert_eq!(catalog_letter("Ōkami"), "0");
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = AnimeSubClient::builder()
            .base_url("http://127.0.0.1:9999/mirror")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9999/mirror/");
        assert_eq!(
            client.endpoint(SEARCH_PATH).unwrap().as_str(),
            "http://127.0.0.1:9999/mirror/szukaj.php"
        );
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let err = AnimeSubClient::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, AnimeSubError::InvalidUrl { .. }));

        let err = AnimeSubClient::builder()
            .base_url("ftp://animesub.info")
            .build()
            .unwrap_err();
        assert!(matches!(err, AnimeSubError::InvalidUrl { .. }));
    }

    #[test]
    fn test_search_query_page_limit_floor() {
        let query = SearchQuery::new("x").page_limit(0);
        assert_eq!(query.page_limit, Some(1));
        assert_eq!(query.sort_by, SortBy::Fitness);
        assert_eq!(query.title_type, TitleType::Original);
    }
}
