//! Mock-site guard for the end-to-end tests.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_SOCKET_TESTS: &str = "ANIMESUBINFO_REQUIRE_SOCKET_TESTS";

/// Starts the mock site the `animesubinfo` binary is pointed at, or `None`
/// when localhost sockets are unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }
    let required = std::env::var(REQUIRE_SOCKET_TESTS)
        .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "yes"));
    assert!(
        !required,
        "[animesubinfo e2e] cannot bind 127.0.0.1 for the mock site and {REQUIRE_SOCKET_TESTS} is set"
    );
    eprintln!("[animesubinfo e2e] cannot bind 127.0.0.1 for the mock site; skipping");
    None
}
