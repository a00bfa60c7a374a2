use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://xrvp-5l6a-rpaf.t7.xano.io/api:z1PY1HTu/chat";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint and timeout for a [`crate::ChatClient`]. Kept out of the client
/// itself so tests can point at a local stub server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Reads `CHAT_API_URL` and `CHAT_API_TIMEOUT_SECS`, falling back to the
    /// built-in defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url = env::var("CHAT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = env::var("CHAT_API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { base_url, timeout }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
