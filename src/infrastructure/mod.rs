//! Storage adapters for the domain ports.

pub mod in_memory;
#[cfg(feature = "storage-sqlite")]
pub mod sqlite;

use crate::application::Services;
use crate::domain::clock::ClockBox;
use crate::error::Result;
use in_memory::InMemoryStore;
use std::path::Path;

/// The store selected at startup.
#[derive(Clone)]
pub enum Backend {
    InMemory(InMemoryStore),
    #[cfg(feature = "storage-sqlite")]
    Sqlite(sqlite::SqliteStore),
}

impl Backend {
    /// SQLite at `db_path` when given, otherwise in-memory. Tables are not
    /// created here; run the schema manager of the resulting services.
    pub async fn open(db_path: Option<&Path>) -> Result<Self> {
        match db_path {
            Some(path) => Self::open_persistent(path).await,
            None => Ok(Self::InMemory(InMemoryStore::new())),
        }
    }

    #[cfg(feature = "storage-sqlite")]
    async fn open_persistent(path: &Path) -> Result<Self> {
        Ok(Self::Sqlite(sqlite::SqliteStore::open(path).await?))
    }

    #[cfg(not(feature = "storage-sqlite"))]
    async fn open_persistent(path: &Path) -> Result<Self> {
        tracing::warn!(
            path = %path.display(),
            "WARNING: Persistent storage requested via --db-path, but 'storage-sqlite' feature is not enabled. Falling back to In-Memory storage."
        );
        Ok(Self::InMemory(InMemoryStore::new()))
    }

    pub fn into_services(self, clock: ClockBox) -> Services {
        match self {
            Self::InMemory(store) => Services::from_store(store, clock),
            #[cfg(feature = "storage-sqlite")]
            Self::Sqlite(store) => Services::from_store(store, clock),
        }
    }
}
