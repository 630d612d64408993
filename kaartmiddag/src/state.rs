//! Top-level application state and the intents that change it.
//!
//! [`AppState`] is a plain value. [`AppState::apply`] never mutates the
//! state it is called on; it returns the next state together with an
//! [`Outcome`] saying which event must be persisted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{EventError, EventResult};
use crate::event::{
    BuiltinNames, CardEvent, EventId, GameType, NameBook, ParticipantId, RoundNumber, Table,
};

/// A user intent coming from the presentation layer
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    CreateEvent {
        title: String,
    },
    DeleteEvent {
        event_id: EventId,
    },
    AddParticipant {
        event_id: EventId,
        name: String,
        game: GameType,
    },
    RemoveParticipant {
        event_id: EventId,
        participant_id: ParticipantId,
    },
    ChangeGame {
        event_id: EventId,
        participant_id: ParticipantId,
        game: GameType,
    },
    SetRoundTables {
        event_id: EventId,
        round: RoundNumber,
        tables: Vec<Table>,
    },
    MoveParticipant {
        event_id: EventId,
        round: RoundNumber,
        participant_id: ParticipantId,
        table_number: usize,
    },
    SetScore {
        event_id: EventId,
        round: RoundNumber,
        participant_id: ParticipantId,
        score: i64,
    },
    ResetTables {
        event_id: EventId,
        round: RoundNumber,
    },
    Advance {
        event_id: EventId,
    },
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CreateEvent { title } => format!("create event '{title}'"),
            Self::DeleteEvent { .. } => "delete event".to_string(),
            Self::AddParticipant { name, game, .. } => format!("add {name} to {game}"),
            Self::RemoveParticipant { .. } => "remove participant".to_string(),
            Self::ChangeGame { game, .. } => format!("switch participant to {game}"),
            Self::SetRoundTables { round, tables, .. } => {
                format!("set {} tables for round {round}", tables.len())
            }
            Self::MoveParticipant {
                round,
                table_number,
                ..
            } => format!("move participant to table {table_number} in round {round}"),
            Self::SetScore { round, score, .. } => format!("score {score} in round {round}"),
            Self::ResetTables { round, .. } => format!("reset tables of round {round}"),
            Self::Advance { .. } => "advance event".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// What an applied intent changed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    Created(EventId),
    Updated(EventId),
    Deleted(EventId),
}

impl Change {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

/// Result of applying an intent
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Outcome {
    pub change: Change,
    /// The learned-name book changed and must be persisted too
    pub names_changed: bool,
}

/// All events plus the learned names
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Events in creation order
    #[serde(default)]
    pub events: Vec<CardEvent>,
    #[serde(default)]
    pub custom_names: NameBook,
    /// Milliseconds since the Unix epoch of the last committed change
    #[serde(default)]
    pub last_modified: i64,
}

impl AppState {
    pub fn new(events: Vec<CardEvent>, custom_names: NameBook) -> Self {
        Self {
            events,
            custom_names,
            last_modified: 0,
        }
    }

    pub fn event(&self, event_id: EventId) -> EventResult<&CardEvent> {
        self.events
            .iter()
            .find(|e| e.id == event_id)
            .ok_or(EventError::EventNotFound(event_id))
    }

    /// Find an event by id, id prefix or case-insensitive title.
    ///
    /// A title match wins over a prefix match; an ambiguous prefix matches
    /// nothing.
    pub fn find_event(&self, reference: &str) -> Option<&CardEvent> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        let wanted = reference.to_lowercase();
        if let Some(event) = self.events.iter().find(|e| e.title.to_lowercase() == wanted) {
            return Some(event);
        }

        let mut by_prefix = self
            .events
            .iter()
            .filter(|e| e.id.to_string().starts_with(&wanted));
        match (by_prefix.next(), by_prefix.next()) {
            (Some(event), None) => Some(event),
            _ => None,
        }
    }

    fn update_event(
        &mut self,
        event_id: EventId,
        update: impl FnOnce(&CardEvent) -> EventResult<CardEvent>,
    ) -> EventResult<Change> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or(EventError::EventNotFound(event_id))?;
        self.events[idx] = update(&self.events[idx])?;
        Ok(Change::Updated(event_id))
    }

    /// Apply an intent, returning the next state.
    ///
    /// On `Err` nothing changed and the caller keeps `self`.
    pub fn apply(&self, intent: Intent, builtin: &BuiltinNames) -> EventResult<(Self, Outcome)> {
        let mut next = self.clone();
        let mut names_changed = false;

        let change = match intent {
            Intent::CreateEvent { title } => {
                let event = CardEvent::new(&title)?;
                let id = event.id;
                next.events.push(event);
                Change::Created(id)
            }
            Intent::DeleteEvent { event_id } => {
                self.event(event_id)?;
                next.events.retain(|e| e.id != event_id);
                Change::Deleted(event_id)
            }
            Intent::AddParticipant {
                event_id,
                name,
                game,
            } => {
                let change = next.update_event(event_id, |e| e.add_participant(&name, game))?;
                names_changed = next
                    .custom_names
                    .learn(&name, game, builtin.for_game(game));
                change
            }
            Intent::RemoveParticipant {
                event_id,
                participant_id,
            } => next.update_event(event_id, |e| e.remove_participant(participant_id))?,
            Intent::ChangeGame {
                event_id,
                participant_id,
                game,
            } => next.update_event(event_id, |e| e.change_game(participant_id, game))?,
            Intent::SetRoundTables {
                event_id,
                round,
                tables,
            } => next.update_event(event_id, |e| e.set_round_tables(round, tables))?,
            Intent::MoveParticipant {
                event_id,
                round,
                participant_id,
                table_number,
            } => next.update_event(event_id, |e| {
                e.move_participant(round, participant_id, table_number)
            })?,
            Intent::SetScore {
                event_id,
                round,
                participant_id,
                score,
            } => next.update_event(event_id, |e| e.set_score(round, participant_id, score))?,
            Intent::ResetTables { event_id, round } => {
                next.update_event(event_id, |e| e.reset_tables(round))?
            }
            Intent::Advance { event_id } => next.update_event(event_id, CardEvent::advance)?,
        };

        next.last_modified = Utc::now().timestamp_millis();
        Ok((
            next,
            Outcome {
                change,
                names_changed,
            },
        ))
    }
}
