//! Profile-data provider (RapidAPI) configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "fresh-linkedin-profile-data.p.rapidapi.com".to_string()
}

fn default_base_url() -> String {
    "https://fresh-linkedin-profile-data.p.rapidapi.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    /// RapidAPI key sent as `x-rapidapi-key`.
    #[serde(default)]
    pub api_key: String,

    /// Value of the `x-rapidapi-host` header.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: default_host(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetcherConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }
}
