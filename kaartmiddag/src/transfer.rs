//! Export and import of the whole application state as one JSON document.
//!
//! The document carries `events`, `customNames` and `lastModified`. Import
//! is all-or-nothing: the document must be a JSON object holding at least
//! one of `events` or `customNames`, and every event in it must validate.

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::EXPORT_FILE_PREFIX;
use crate::errors::EventError;
use crate::event::EventId;
use crate::state::AppState;

/// Import/export errors
#[derive(Debug, Error)]
pub enum TransferError {
    /// Not JSON, or JSON of the wrong shape
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Document holds neither events nor customNames")]
    MissingContent,

    #[error("Duplicate event id {0}")]
    DuplicateEvent(EventId),

    #[error("Invalid event: {0}")]
    InvalidEvent(#[from] EventError),
}

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// Serialize the state as a pretty-printed export document
pub fn export_json(state: &AppState) -> TransferResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Suggested file name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.json", date.format("%Y-%m-%d"))
}

/// Parse and validate an export document.
///
/// `null` members count as absent. The returned state is stamped with the
/// current time.
pub fn import_json(raw: &str) -> TransferResult<AppState> {
    let mut value: Value = serde_json::from_str(raw)?;
    let object = value.as_object_mut().ok_or(TransferError::NotAnObject)?;
    object.retain(|_, member| !member.is_null());
    if !object.contains_key("events") && !object.contains_key("customNames") {
        return Err(TransferError::MissingContent);
    }

    let mut state: AppState = serde_json::from_value(value)?;

    let mut seen = HashSet::new();
    for event in &state.events {
        if !seen.insert(event.id) {
            return Err(TransferError::DuplicateEvent(event.id));
        }
        event.validate()?;
    }

    state.last_modified = Utc::now().timestamp_millis();
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "kaartavond_gegevens_2026-03-07.json");
    }

    #[test]
    fn test_import_rejects_non_objects() {
        assert!(matches!(import_json("[]"), Err(TransferError::NotAnObject)));
        assert!(matches!(import_json("42"), Err(TransferError::NotAnObject)));
        assert!(matches!(import_json("{"), Err(TransferError::Malformed(_))));
    }

    #[test]
    fn test_import_requires_content() {
        assert!(matches!(
            import_json(r#"{"lastModified": 1}"#),
            Err(TransferError::MissingContent)
        ));
        assert!(matches!(
            import_json(r#"{"events": null}"#),
            Err(TransferError::MissingContent)
        ));
    }

    #[test]
    fn test_import_names_only() {
        let state = import_json(r#"{"customNames": {"Jokeren": ["Piet"], "Rikken": []}}"#).unwrap();
        assert!(state.events.is_empty());
        assert_eq!(state.custom_names.jokeren, vec!["Piet".to_string()]);
        assert!(state.last_modified > 0);
    }

    #[test]
    fn test_import_empty_events() {
        let state = import_json(r#"{"events": [], "customNames": null}"#).unwrap();
        assert!(state.events.is_empty());
    }
}
