use super::*;

/// # Safety
/// Tests touching these vars must not run concurrently with each other.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("SOLUTION_API_HOST");
        std::env::remove_var("SOLUTION_STATE_DIR");
        std::env::remove_var("SOLUTION_POLL_INTERVAL_MS");
        std::env::remove_var("SOLUTION_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("SOLUTION_CONNECT_TIMEOUT_SECS");
    }
}

// =============================================================================
// api_base
// =============================================================================

#[test]
fn api_base_appends_api_prefix() {
    assert_eq!(api_base("http://localhost:29847"), "http://localhost:29847/api");
}

#[test]
fn api_base_keeps_existing_api_suffix() {
    assert_eq!(api_base("https://example.test/api"), "https://example.test/api");
    assert_eq!(api_base("https://example.test/api/"), "https://example.test/api");
}

#[test]
fn api_base_trims_trailing_slash_before_appending() {
    assert_eq!(api_base("https://example.test/"), "https://example.test/api");
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u64 = env_parse("__TEST_SC_NONEXISTENT_KEY_4411__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__TEST_SC_INVALID__", "soon") };
    let val: u64 = env_parse("__TEST_SC_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__TEST_SC_INVALID__") };
}

#[test]
fn env_parse_trims_whitespace() {
    unsafe { std::env::set_var("__TEST_SC_WS__", " 15 ") };
    let val: u64 = env_parse("__TEST_SC_WS__", 0);
    assert_eq!(val, 15);
    unsafe { std::env::remove_var("__TEST_SC_WS__") };
}

// =============================================================================
// ClientConfig::from_env
// =============================================================================

#[test]
fn from_env_applies_defaults_and_overrides() {
    unsafe { clear_client_env() };
    let cfg = ClientConfig::from_env();
    assert_eq!(cfg.api_host, DEFAULT_API_HOST);
    assert_eq!(cfg.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    assert_eq!(cfg.timeouts, Timeouts::default());
    assert!(cfg.state_dir.ends_with(".solution-client"));

    unsafe {
        std::env::set_var("SOLUTION_API_HOST", "https://docs.example.test/api");
        std::env::set_var("SOLUTION_STATE_DIR", "/tmp/solution-state");
        std::env::set_var("SOLUTION_POLL_INTERVAL_MS", "250");
        std::env::set_var("SOLUTION_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("SOLUTION_CONNECT_TIMEOUT_SECS", "3");
    }
    let cfg = ClientConfig::from_env();
    assert_eq!(cfg.api_base(), "https://docs.example.test/api");
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/solution-state"));
    assert_eq!(cfg.poll_interval, Duration::from_millis(250));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 30, connect_secs: 3 });

    unsafe { clear_client_env() };
}
