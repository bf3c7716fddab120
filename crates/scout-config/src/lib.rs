//! # scout-config
//!
//! Layered configuration loading for the scout using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCOUT_*` prefix, `__` as separator)
//! 2. Project-level `.scout/config.toml`
//! 3. User-level `~/.config/scout/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `SCOUT_FETCHER__API_KEY` -> `fetcher.api_key`,
//! `SCOUT_REFRESH__MAX_CONCURRENCY` -> `refresh.max_concurrency`, etc.
//!
//! ```no_run
//! use scout_config::ScoutConfig;
//!
//! let config = ScoutConfig::load_with_dotenv().expect("config");
//! if config.fetcher.is_configured() {
//!     println!("provider: {}", config.fetcher.base_url);
//! }
//! ```

mod classifier;
mod error;
mod fetcher;
mod refresh;
mod store;

pub use classifier::ClassifierConfig;
pub use error::ConfigError;
pub use fetcher::FetcherConfig;
pub use refresh::RefreshConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl ScoutConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.refresh.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".scout/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SCOUT_").split("__"))
    }

    /// Fail fast when a section the caller needs has no credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the section.
    pub fn require_collaborators(&self) -> Result<(), ConfigError> {
        if !self.fetcher.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "fetcher".into(),
            });
        }
        if !self.classifier.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "classifier".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scout").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = ScoutConfig::default();
        assert!(!config.fetcher.is_configured());
        assert!(!config.classifier.is_configured());
        assert_eq!(config.refresh.max_concurrency, 4);
    }

    #[test]
    fn missing_credentials_name_the_section() {
        let err = ScoutConfig::default().require_collaborators().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section.as_str() == "fetcher"));
    }
}
