//! Service layer owning the store handle.
//!
//! `ScoutService` wraps [`ScoutDb`]. All repository methods (profiles,
//! transitions) are implemented as `impl ScoutService` blocks under
//! [`crate::repos`].

use scout_config::StoreConfig;

use crate::ScoutDb;
use crate::error::DatabaseError;

pub struct ScoutService {
    db: ScoutDb,
}

impl ScoutService {
    /// Open a service over a local database file or `":memory:"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: ScoutDb::open_local(db_path).await?,
        })
    }

    /// Open the store described by `config`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn open(config: &StoreConfig) -> Result<Self, DatabaseError> {
        let path = config.path();
        if !config.is_in_memory()
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Self::new_local(&config.db_path).await
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ScoutDb {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("scout.db");
        let config = StoreConfig {
            db_path: db_path.to_string_lossy().into_owned(),
        };

        ScoutService::open(&config).await.unwrap();

        assert!(db_path.parent().unwrap().is_dir());
    }
}
