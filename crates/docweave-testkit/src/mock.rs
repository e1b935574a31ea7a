//! Shared mock server for remote image tests
//!
//! One mockito server serves every test in a binary. Tests keep their mocks
//! apart by using unique paths.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use std::sync::{Mutex, MutexGuard};

lazy_static! {
    /// Global shared mockito server for all tests
    pub static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get reference to shared mock server
///
/// Hold the guard only while creating mocks, not for the whole test.
///
/// ```no_run
/// use docweave_testkit::get_shared_mock_server;
///
/// let (mock, base) = {
///     let mut server = get_shared_mock_server();
///     let mock = server.mock("GET", "/unique-test/logo.png").with_status(200).create();
///     (mock, server.url())
/// };
/// ```
pub fn get_shared_mock_server() -> MutexGuard<'static, ServerGuard> {
    // mockito stays usable after a panicking test; the lock only serializes setup
    SHARED_MOCK_SERVER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Base URL of the shared server, e.g. `http://127.0.0.1:1234`
pub fn shared_mock_url() -> String {
    get_shared_mock_server().url()
}
