//! Client configuration parsed from environment variables.
//!
//! Every knob has a typed default so a bare environment yields a client
//! pointed at a local backend. Unparsable numeric values fall back to the
//! default rather than failing startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "http://localhost:29847";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const STATE_DIR_NAME: &str = ".solution-client";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend host, with or without a trailing `/api`.
    pub api_host: String,
    /// Directory holding persisted client state (token, preferences).
    pub state_dir: PathBuf,
    /// Fixed delay between file-parse poll ticks.
    pub poll_interval: Duration,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_owned(),
            state_dir: default_state_dir(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SOLUTION_API_HOST`: default `http://localhost:29847`
    /// - `SOLUTION_STATE_DIR`: default `~/.solution-client`
    /// - `SOLUTION_POLL_INTERVAL_MS`: default 2000
    /// - `SOLUTION_REQUEST_TIMEOUT_SECS`: default 120
    /// - `SOLUTION_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_host = std::env::var("SOLUTION_API_HOST")
            .map(|v| v.trim().to_owned())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_owned());
        let state_dir = std::env::var_os("SOLUTION_STATE_DIR").map_or_else(default_state_dir, PathBuf::from);
        let poll_interval_ms = env_parse("SOLUTION_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let timeouts = Timeouts {
            request_secs: env_parse("SOLUTION_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("SOLUTION_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_host, state_dir, poll_interval: Duration::from_millis(poll_interval_ms), timeouts }
    }

    /// Base URL every API path is joined onto.
    ///
    /// `/api` is appended unless the host already ends with it, so both
    /// `http://host:29847` and `http://host/api` resolve to the same routes.
    #[must_use]
    pub fn api_base(&self) -> String {
        api_base(&self.api_host)
    }
}

pub(crate) fn api_base(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.ends_with("/api") { host.to_owned() } else { format!("{host}/api") }
}

fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_DIR_NAME)
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
