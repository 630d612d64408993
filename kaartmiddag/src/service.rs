//! Event service: the single owner of the application state.
//!
//! Every intent is applied to a copy of the state, written through the
//! store and only then committed in memory. A rejected intent or a failed
//! write leaves the current state exactly as it was.

use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::errors::EventError;
use crate::event::{BuiltinNames, CardEvent, EventId};
use crate::state::{AppState, Change, Intent, Outcome};
use crate::storage::{EventStore, StorageError};
use crate::transfer::{self, TransferError};

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl ServiceError {
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::Event(err) => err.client_message(),
            ServiceError::Storage(err) => err.client_message(),
            ServiceError::Transfer(err) => err.to_string(),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Owns the state and the store behind it
pub struct EventService<S: EventStore + ?Sized> {
    store: Arc<S>,
    state: AppState,
    builtin: BuiltinNames,
}

impl<S: EventStore + ?Sized> EventService<S> {
    /// Load the stored state.
    ///
    /// Stored events that fail validation are skipped with a warning rather
    /// than failing the whole load.
    pub async fn open(store: Arc<S>, builtin: BuiltinNames) -> ServiceResult<Self> {
        let loaded = store.load_all().await?;
        let custom_names = store.load_names().await?;

        let total = loaded.len();
        let events: Vec<CardEvent> = loaded
            .into_iter()
            .filter(|event| match event.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("Skipping stored event '{}': {err}", event.title);
                    false
                }
            })
            .collect();
        info!("Loaded {} of {total} stored events", events.len());

        Ok(Self {
            store,
            state: AppState::new(events, custom_names),
            builtin,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn events(&self) -> &[CardEvent] {
        &self.state.events
    }

    pub fn event(&self, event_id: EventId) -> ServiceResult<&CardEvent> {
        Ok(self.state.event(event_id)?)
    }

    pub fn builtin_names(&self) -> &BuiltinNames {
        &self.builtin
    }

    /// Apply an intent, persist it and commit it
    pub async fn dispatch(&mut self, intent: Intent) -> ServiceResult<Outcome> {
        debug!("Dispatching: {intent}");
        let (next, outcome) = match self.state.apply(intent, &self.builtin) {
            Ok(applied) => applied,
            Err(err) => {
                warn!("Intent rejected: {err}");
                return Err(err.into());
            }
        };

        match outcome.change {
            Change::Created(id) | Change::Updated(id) if outcome.names_changed => {
                self.store
                    .save_with_names(next.event(id)?, &next.custom_names)
                    .await?;
            }
            Change::Created(id) | Change::Updated(id) => {
                self.store.save(next.event(id)?).await?;
            }
            Change::Deleted(id) => {
                self.store.delete(id).await?;
                info!("Deleted event {id}");
            }
        }

        self.state = next;
        Ok(outcome)
    }

    /// Replace the whole state with an imported document.
    ///
    /// Returns the number of imported events.
    pub async fn import(&mut self, raw: &str) -> ServiceResult<usize> {
        let imported = transfer::import_json(raw)?;
        self.store
            .replace_all(&imported.events, &imported.custom_names)
            .await?;

        let count = imported.events.len();
        self.state = imported;
        info!("Imported {count} events");
        Ok(count)
    }

    /// The whole state as an export document
    pub fn export(&self) -> ServiceResult<String> {
        Ok(transfer::export_json(&self.state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::GameType;
    use crate::storage::MemoryEventStore;
    use async_trait::async_trait;

    use crate::event::NameBook;
    use crate::storage::StorageResult;

    /// Store whose writes always fail
    struct BrokenStore;

    #[async_trait]
    impl EventStore for BrokenStore {
        async fn load_all(&self) -> StorageResult<Vec<CardEvent>> {
            Ok(Vec::new())
        }
        async fn save(&self, _event: &CardEvent) -> StorageResult<()> {
            Err(StorageError::Config("read-only".to_string()))
        }
        async fn delete(&self, _event_id: EventId) -> StorageResult<()> {
            Err(StorageError::Config("read-only".to_string()))
        }
        async fn load_names(&self) -> StorageResult<NameBook> {
            Ok(NameBook::new())
        }
        async fn save_names(&self, _names: &NameBook) -> StorageResult<()> {
            Err(StorageError::Config("read-only".to_string()))
        }
        async fn save_with_names(&self, _event: &CardEvent, _names: &NameBook) -> StorageResult<()> {
            Err(StorageError::Config("read-only".to_string()))
        }
        async fn replace_all(&self, _events: &[CardEvent], _names: &NameBook) -> StorageResult<()> {
            Err(StorageError::Config("read-only".to_string()))
        }
    }

    /// Store that accepts event writes but rejects any write touching names
    #[derive(Default)]
    struct NamesLockedStore {
        inner: MemoryEventStore,
    }

    #[async_trait]
    impl EventStore for NamesLockedStore {
        async fn load_all(&self) -> StorageResult<Vec<CardEvent>> {
            self.inner.load_all().await
        }
        async fn save(&self, event: &CardEvent) -> StorageResult<()> {
            self.inner.save(event).await
        }
        async fn delete(&self, event_id: EventId) -> StorageResult<()> {
            self.inner.delete(event_id).await
        }
        async fn load_names(&self) -> StorageResult<NameBook> {
            self.inner.load_names().await
        }
        async fn save_names(&self, _names: &NameBook) -> StorageResult<()> {
            Err(StorageError::Config("names locked".to_string()))
        }
        async fn save_with_names(&self, _event: &CardEvent, _names: &NameBook) -> StorageResult<()> {
            Err(StorageError::Config("names locked".to_string()))
        }
        async fn replace_all(&self, events: &[CardEvent], names: &NameBook) -> StorageResult<()> {
            self.inner.replace_all(events, names).await
        }
    }

    #[tokio::test]
    async fn test_failed_write_keeps_state() {
        let mut service = EventService::open(Arc::new(BrokenStore), BuiltinNames::default())
            .await
            .unwrap();
        let err = service
            .dispatch(Intent::CreateEvent {
                title: "Niet bewaard".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(service.events().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_persists() {
        let store = Arc::new(MemoryEventStore::new());
        let mut service = EventService::open(store.clone(), BuiltinNames::default())
            .await
            .unwrap();
        let outcome = service
            .dispatch(Intent::CreateEvent {
                title: "Bewaard".to_string(),
            })
            .await
            .unwrap();
        let id = outcome.change.event_id();
        service
            .dispatch(Intent::AddParticipant {
                event_id: id,
                name: "jan".to_string(),
                game: GameType::Rikken,
            })
            .await
            .unwrap();

        let stored = store.load_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].participants[0].name, "Jan");
        assert_eq!(store.load_names().await.unwrap().rikken, vec!["Jan".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_name_write_keeps_event_unwritten() {
        let store = Arc::new(NamesLockedStore::default());
        let mut service = EventService::open(store.clone(), BuiltinNames::default())
            .await
            .unwrap();
        let id = service
            .dispatch(Intent::CreateEvent {
                title: "Zondag".to_string(),
            })
            .await
            .unwrap()
            .change
            .event_id();

        let err = service
            .dispatch(Intent::AddParticipant {
                event_id: id,
                name: "nieuw".to_string(),
                game: GameType::Jokeren,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(service.event(id).unwrap().participants.is_empty());

        let stored = store.load_all().await.unwrap();
        assert!(stored[0].participants.is_empty());
        assert!(store.load_names().await.unwrap().jokeren.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_intent_is_not_written() {
        let store = Arc::new(MemoryEventStore::new());
        let mut service = EventService::open(store.clone(), BuiltinNames::default())
            .await
            .unwrap();
        let err = service
            .dispatch(Intent::CreateEvent {
                title: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Event(EventError::EmptyName)));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_skips_invalid_events() {
        let store = Arc::new(MemoryEventStore::new());
        let mut broken = CardEvent::new("Kapot").unwrap();
        broken.status = crate::event::EventStatus::Round2;
        store.save(&broken).await.unwrap();
        store.save(&CardEvent::new("Heel").unwrap()).await.unwrap();

        let service = EventService::open(store, BuiltinNames::default())
            .await
            .unwrap();
        assert_eq!(service.events().len(), 1);
        assert_eq!(service.events()[0].title, "Heel");
    }
}
