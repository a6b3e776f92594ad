// HTTP transport construction.
//
// Builds the `reqwest::Client` a session talks through: fixed timeout,
// fixed user agent, JSON default headers, and a private cookie jar.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN};

use crate::error::Cause;

/// User agent sent on every request.
pub const USER_AGENT: &str = concat!("unictl/", env!("CARGO_PKG_VERSION"));

/// Request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for building a session transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub cookie_jar: Arc<Jar>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: true,
            cookie_jar: Arc::new(Jar::default()),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` whose requests all carry the JSON
    /// headers and an `Origin` equal to `origin`.
    pub fn build_client(&self, origin: &str) -> Result<reqwest::Client, Cause> {
        let origin =
            HeaderValue::from_str(origin).map_err(|e| Cause::Transport(format!("origin: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, origin);

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .cookie_provider(Arc::clone(&self.cookie_jar))
            .build()
            .map_err(|e| Cause::Transport(e.to_string()))
    }
}
