//! HTTP plumbing shared by the client operations.
//!
//! Client construction, request dispatch with error mapping, and page
//! decoding live here so `client/mod.rs` reads as the site protocol only.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Proxy, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::constants::SESSION_COOKIE;
use crate::error::AnimeSubError;
use crate::parser::decode_page;
use crate::user_agent;

/// A decoded HTML page plus the session cookie the site set with it.
#[derive(Debug)]
pub(crate) struct FetchedPage {
    pub(crate) body: String,
    pub(crate) session_cookie: Option<String>,
}

/// Builds the HTTP client with the configured timeouts.
///
/// Some sandboxed environments panic while reading system proxy settings;
/// in that case the client is rebuilt with proxies taken from the
/// environment only.
pub(crate) fn build_http_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
) -> Result<Client, AnimeSubError> {
    match try_build_client(connect_timeout_secs, read_timeout_secs, false) {
        Err(BuildClientFailure::Panic) => {
            warn!("HTTP client builder panicked while loading system proxy settings; retrying with env-proxy fallback");
            client_or_error(try_build_client(connect_timeout_secs, read_timeout_secs, true))
        }
        first => client_or_error(first),
    }
}

fn client_or_error(result: Result<Client, BuildClientFailure>) -> Result<Client, AnimeSubError> {
    match result {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Build(source)) => Err(AnimeSubError::ClientBuild { source }),
        Err(BuildClientFailure::Panic) => Err(AnimeSubError::ClientBuildPanicked),
    }
}

#[derive(Debug)]
enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(connect_timeout_secs, read_timeout_secs);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(connect_timeout_secs: u64, read_timeout_secs: u64) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    // The site is plain HTTP; HTTPS proxies only matter for redirects.
    for (scheme, names) in [
        ("http", ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        ("https", ["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
    ] {
        let Some(proxy) = names.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }) else {
            continue;
        };
        let resolved = if scheme == "http" {
            Proxy::http(&proxy)
        } else {
            Proxy::https(&proxy)
        };
        if let Ok(resolved) = resolved {
            builder = builder.proxy(resolved);
        }
    }
    builder
}

/// Sends a request, mapping transport failures and non-success statuses.
pub(crate) async fn send(request: RequestBuilder, url: &str) -> Result<Response, AnimeSubError> {
    let response = request
        .send()
        .await
        .map_err(|e| AnimeSubError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        debug!(url, status = status.as_u16(), "request failed");
        return Err(AnimeSubError::http_status(url, status.as_u16()));
    }
    Ok(response)
}

/// GETs a page and decodes it from the site encoding.
pub(crate) async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, AnimeSubError> {
    debug!(url, "fetching page");
    let response = send(client.get(url), url).await?;

    let session_cookie = response
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let content_type = header_str(&response, CONTENT_TYPE).map(str::to_string);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AnimeSubError::network(url, e))?;

    Ok(FetchedPage {
        body: decode_page(&bytes, content_type.as_deref()),
        session_cookie,
    })
}

/// A response header as text, when present and valid ASCII.
pub(crate) fn header_str(
    response: &Response,
    name: reqwest::header::HeaderName,
) -> Option<&str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
#[path = "../../tests/support/socket_guard.rs"]
mod socket_guard;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::socket_guard::start_mock_server_or_skip;
    use super::*;

    #[tokio::test]
    async fn test_fetch_page_decodes_latin2_and_reads_cookie() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        // "Zażółć" in ISO-8859-2
        let body: &[u8] = b"<p>Za\xbf\xf3\xb3\xe6</p>";
        Mock::given(method("GET"))
            .and(path("/szukaj.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .insert_header("set-cookie", "ansi_sciagnij=abc123; path=/")
                    .set_body_bytes(body),
            )
            .mount(&server)
            .await;

        let client = build_http_client(5, 5).unwrap();
        let url = format!("{}/szukaj.php", server.uri());
        let page = fetch_page(&client, &url).await.unwrap();
        assert_eq!(page.body, "<p>Zażółć</p>");
        assert_eq!(page.session_cookie.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_send_maps_error_status() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_http_client(5, 5).unwrap();
        let url = format!("{}/katalog.php", server.uri());
        let err = send(client.get(&url), &url).await.unwrap_err();
        assert!(matches!(err, AnimeSubError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_repeated_builder_panic_becomes_error() {
        let err = client_or_error(Err(BuildClientFailure::Panic)).unwrap_err();
        assert!(matches!(err, AnimeSubError::ClientBuildPanicked));
    }

    #[test]
    fn test_build_client_with_env_proxy_fallback() {
        let client = try_build_client(5, 5, true);
        assert!(client_or_error(client).is_ok());
    }

    #[tokio::test]
    async fn test_send_maps_connection_failure() {
        let client = build_http_client(2, 2).unwrap();
        let url = "http://127.0.0.1:9/szukaj.php";
        let err = send(client.get(url), url).await.unwrap_err();
        assert!(matches!(
            err,
            AnimeSubError::Network { .. } | AnimeSubError::Timeout { .. }
        ));
    }
}
