//! Mutex poison recovery
//!
//! Poisoning is permanent for the lifetime of a test binary, so these tests
//! live in their own binary.

use docweave_testkit::{get_shared_mock_server, mock::shared_mock_url};
use std::thread;

#[test]
fn test_shared_mock_server_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _guard = get_shared_mock_server();
        panic!("Simulated panic to poison server mutex");
    });

    let _ = handle.join();

    let result = std::panic::catch_unwind(|| {
        let _guard = get_shared_mock_server();
    });

    assert!(result.is_ok(), "Server lock should recover from poison");
    assert!(shared_mock_url().starts_with("http://"));
}
