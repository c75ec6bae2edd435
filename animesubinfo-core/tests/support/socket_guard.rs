//! Skips mock-server tests where localhost sockets cannot be bound.
//!
//! Shared by the integration tests and the `client::http` unit tests.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKET_TESTS: &str = "ANIMESUBINFO_REQUIRE_SOCKET_TESTS";

fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_SOCKET_TESTS)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a stand-in for the AnimeSub.info site, or `None` when the sandbox
/// forbids binding `127.0.0.1`.
///
/// Panics instead of skipping when `ANIMESUBINFO_REQUIRE_SOCKET_TESTS` is set.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let skip = !localhost_available();
    async move {
        if skip {
            None
        } else {
            Some(MockServer::start().await)
        }
    }
}

#[track_caller]
fn localhost_available() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return true;
    }
    let location = Location::caller();
    let message = format!(
        "[animesubinfo] no localhost socket for the mock site at {}:{}",
        location.file(),
        location.line()
    );
    assert!(
        !socket_tests_required(),
        "{message}; {REQUIRE_SOCKET_TESTS} is set, refusing to skip"
    );
    eprintln!("{message}; skipping");
    false
}
