//! JSON document store.
//!
//! The whole state lives in one file shaped like the export document. Every
//! write goes to a sibling temp file first and is then renamed over the
//! target, so a crash never leaves a half-written document behind.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::EventStore;
use super::errors::{StorageError, StorageResult};
use crate::event::{CardEvent, EventId, NameBook};
use crate::state::AppState;

/// Event store backed by a single JSON file
#[derive(Debug)]
pub struct FileEventStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing or empty file is an empty state
    async fn read(&self) -> StorageResult<AppState> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(AppState::default()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(AppState::default());
        }

        serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    async fn write(&self, mut state: AppState) -> StorageResult<()> {
        state.last_modified = Utc::now().timestamp_millis();
        let body = serde_json::to_vec_pretty(&state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(
            "Wrote {} events to {}",
            state.events.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read-modify-write under the store's lock
    async fn update(&self, change: impl FnOnce(&mut AppState)) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read().await?;
        change(&mut state);
        self.write(state).await
    }
}

fn upsert(events: &mut Vec<CardEvent>, event: &CardEvent) {
    match events.iter_mut().find(|e| e.id == event.id) {
        Some(slot) => *slot = event.clone(),
        None => events.push(event.clone()),
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn load_all(&self) -> StorageResult<Vec<CardEvent>> {
        Ok(self.read().await?.events)
    }

    async fn save(&self, event: &CardEvent) -> StorageResult<()> {
        self.update(|state| upsert(&mut state.events, event)).await
    }

    async fn delete(&self, event_id: EventId) -> StorageResult<()> {
        self.update(|state| state.events.retain(|e| e.id != event_id))
            .await
    }

    async fn load_names(&self) -> StorageResult<NameBook> {
        Ok(self.read().await?.custom_names)
    }

    async fn save_names(&self, names: &NameBook) -> StorageResult<()> {
        self.update(|state| state.custom_names = names.clone()).await
    }

    async fn save_with_names(&self, event: &CardEvent, names: &NameBook) -> StorageResult<()> {
        self.update(|state| {
            upsert(&mut state.events, event);
            state.custom_names = names.clone();
        })
        .await
    }

    async fn replace_all(&self, events: &[CardEvent], names: &NameBook) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(AppState::new(events.to_vec(), names.clone()))
            .await
    }
}
