use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default analytics API base URL for local development.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Username/password pair for the token endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client configuration, passed explicitly to [`crate::api::DashboardApi`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Analytics API base URL (default: `http://localhost:8000`).
    pub base_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Credentials to log in with, when both are configured.
    pub credentials: Option<Credentials>,
    /// A pre-issued bearer token to start with.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            credentials: None,
            token: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `API_BASE`             | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `API_USERNAME`         | --                      |
    /// | `API_PASSWORD`         | --                      |
    /// | `API_TOKEN`            | --                      |
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty("API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.into())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs = match non_empty("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let credentials = match (non_empty("API_USERNAME"), non_empty("API_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(Self {
            base_url,
            request_timeout_secs,
            credentials,
            token: non_empty("API_TOKEN"),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
