//! Persistence of events and learned names.
//!
//! All backends implement [`EventStore`]. The service writes through the
//! store before it commits a change in memory, so a failed write leaves the
//! in-memory state untouched.
//!
//! ## Backends
//!
//! - [`MemoryEventStore`]: process memory, for tests
//! - [`FileEventStore`]: one JSON document, the default
//! - [`PgEventStore`]: PostgreSQL with one row per event and per round

use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod file;
pub mod memory;
pub mod postgres;

pub use config::{DatabaseConfig, StorageConfig, StoreKind};
pub use errors::{StorageError, StorageResult};
pub use file::FileEventStore;
pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

use crate::event::{CardEvent, EventId, NameBook};

/// Trait for event persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events in creation order
    async fn load_all(&self) -> StorageResult<Vec<CardEvent>>;

    /// Insert or replace one event
    async fn save(&self, event: &CardEvent) -> StorageResult<()>;

    /// Remove an event and its rounds; unknown ids are ignored
    async fn delete(&self, event_id: EventId) -> StorageResult<()>;

    async fn load_names(&self) -> StorageResult<NameBook>;

    async fn save_names(&self, names: &NameBook) -> StorageResult<()>;

    /// Insert or replace one event and the learned names in one write
    async fn save_with_names(&self, event: &CardEvent, names: &NameBook) -> StorageResult<()>;

    /// Replace everything at once (used by import)
    async fn replace_all(&self, events: &[CardEvent], names: &NameBook) -> StorageResult<()>;
}

/// Open the store selected by `config`
pub async fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn EventStore>> {
    config.validate()?;
    let store: Arc<dyn EventStore> = match config.kind {
        StoreKind::Memory => Arc::new(MemoryEventStore::new()),
        StoreKind::File => Arc::new(FileEventStore::new(&config.data_file)),
        StoreKind::Postgres => {
            let store = PgEventStore::connect(&config.database).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
    };
    info!("Opened {} store", config.kind);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StorageConfig::memory()).await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_postgres_without_url_fails() {
        let config = StorageConfig {
            kind: StoreKind::Postgres,
            ..StorageConfig::default()
        };
        assert!(matches!(
            open_store(&config).await,
            Err(StorageError::Config(_))
        ));
    }
}
