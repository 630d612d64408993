//! In-memory event store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EventStore;
use super::errors::StorageResult;
use crate::event::{CardEvent, EventId, NameBook};

/// Event store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<CardEvent>>,
    names: RwLock<NameBook>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn load_all(&self) -> StorageResult<Vec<CardEvent>> {
        Ok(self.events.read().await.clone())
    }

    async fn save(&self, event: &CardEvent) -> StorageResult<()> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event.clone(),
            None => events.push(event.clone()),
        }
        Ok(())
    }

    async fn delete(&self, event_id: EventId) -> StorageResult<()> {
        self.events.write().await.retain(|e| e.id != event_id);
        Ok(())
    }

    async fn load_names(&self) -> StorageResult<NameBook> {
        Ok(self.names.read().await.clone())
    }

    async fn save_names(&self, names: &NameBook) -> StorageResult<()> {
        *self.names.write().await = names.clone();
        Ok(())
    }

    async fn save_with_names(&self, event: &CardEvent, names: &NameBook) -> StorageResult<()> {
        let mut events = self.events.write().await;
        let mut stored_names = self.names.write().await;
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event.clone(),
            None => events.push(event.clone()),
        }
        *stored_names = names.clone();
        Ok(())
    }

    async fn replace_all(&self, events: &[CardEvent], names: &NameBook) -> StorageResult<()> {
        let mut stored = self.events.write().await;
        let mut stored_names = self.names.write().await;
        *stored = events.to_vec();
        *stored_names = names.clone();
        Ok(())
    }
}
