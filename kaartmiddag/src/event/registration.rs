//! Participant registration operations.
//!
//! All operations take the current snapshot by reference and return a new
//! one; an `Err` leaves the caller's snapshot as it was.

use log::debug;

use super::entities::{CardEvent, EventStatus, GameType, Participant, ParticipantId};
use super::names::normalize_name;
use crate::errors::{EventError, EventResult};

impl CardEvent {
    /// Register a new participant under `game`.
    pub fn add_participant(&self, name: &str, game: GameType) -> EventResult<Self> {
        if self.status != EventStatus::Registration {
            return Err(EventError::RegistrationClosed(self.status));
        }

        let name = normalize_name(name);
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        if self.participant_by_name(&name).is_some() {
            return Err(EventError::DuplicateParticipant(name));
        }

        debug!("Registering {name} for {game} in {}", self.title);
        let mut next = self.clone();
        next.participants.push(Participant::new(name, game));
        Ok(next)
    }

    /// Remove a participant. Only allowed during registration.
    pub fn remove_participant(&self, participant_id: ParticipantId) -> EventResult<Self> {
        if self.status != EventStatus::Registration {
            return Err(EventError::RegistrationClosed(self.status));
        }
        self.participant(&participant_id)?;

        let mut next = self.clone();
        next.participants.retain(|p| p.id != participant_id);
        Ok(next)
    }

    /// Move a participant to another game.
    ///
    /// Once rounds exist the participant is unseated from every table of the
    /// old game (emptied tables are pruned); their scores are kept.
    pub fn change_game(&self, participant_id: ParticipantId, game: GameType) -> EventResult<Self> {
        if self.status == EventStatus::Results {
            return Err(EventError::GameLocked);
        }

        let current = self.participant(&participant_id)?;
        if current.game == game {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        for participant in &mut next.participants {
            if participant.id == participant_id {
                participant.game = game;
            }
        }
        for round in &mut next.rounds {
            for table in &mut round.tables {
                if table.game != game {
                    table.participant_ids.retain(|id| id != &participant_id);
                }
            }
            round.tables.retain(|t| !t.is_empty());
        }
        Ok(next)
    }
}
