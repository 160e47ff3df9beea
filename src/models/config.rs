//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;
use validator::Validate;

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_preferences_db() -> String {
    "eventos-board.db".to_string()
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Settings of the board client.
pub struct ClientConfig {
    /// Base URL of the CRM API, e.g. `http://localhost:5000/api`.
    #[validate(url)]
    pub api_url: String,
    #[validate(length(min = 1))]
    pub email: String,
    pub password: String,
    /// SQLite file holding view preferences.
    #[serde(default = "default_preferences_db")]
    pub preferences_db: String,
    #[serde(default = "default_poll_interval_secs")]
    #[validate(range(min = 1))]
    pub poll_interval_secs: u64,
    /// Per-request timeout; the HTTP client default applies when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
