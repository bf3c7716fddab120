//! Local libSQL store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_db_path() -> String {
    ".scout/scout.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the local database file. `:memory:` opens a throwaway store.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.db_path)
    }
}
