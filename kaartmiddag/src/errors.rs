//! Validation errors raised by the core event operations.
//!
//! Every variant is a rejection: the requested mutation did not happen and
//! the caller keeps the snapshot it already had.

use thiserror::Error;

use crate::event::{EventId, EventStatus, GameType, ParticipantId};

/// Core event errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Name or title was empty after normalization
    #[error("Name must not be empty")]
    EmptyName,

    /// A participant with the same name is already registered
    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    /// Event not found
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// Participant not found in the event
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Registration is closed for this event
    #[error("Registration is closed (event is in {0})")]
    RegistrationClosed(EventStatus),

    /// Game membership is frozen once results are in
    #[error("Game can no longer change once the event is finished")]
    GameLocked,

    /// The round has not been reached yet
    #[error("Round {0} has not been reached")]
    RoundNotReached(u8),

    /// Lifecycle cannot move past the results
    #[error("Event is already finished")]
    AlreadyFinished,

    /// Round 1 needs at least one participant
    #[error("Need at least one participant to start")]
    NoParticipants,

    /// Seat {participant} at a table of the wrong game
    #[error("Participant {participant} plays {expected}, not {actual}")]
    GameMismatch {
        participant: ParticipantId,
        expected: GameType,
        actual: GameType,
    },

    /// Same participant seated twice in one round
    #[error("Participant {0} is seated more than once")]
    DoubleSeated(ParticipantId),

    /// Event failed a structural invariant check
    #[error("Invalid event {event}: {reason}")]
    InvalidEvent { event: EventId, reason: String },
}

impl EventError {
    /// Get an operator-facing message without internal identifiers
    pub fn client_message(&self) -> String {
        match self {
            EventError::EventNotFound(_) => "Event not found".to_string(),
            EventError::ParticipantNotFound(_) => "Participant not found".to_string(),
            EventError::DoubleSeated(_) => "A participant is seated more than once".to_string(),
            EventError::GameMismatch { expected, actual, .. } => {
                format!("A {expected} participant cannot sit at a {actual} table")
            }
            EventError::InvalidEvent { reason, .. } => format!("Invalid event: {reason}"),
            _ => self.to_string(),
        }
    }
}

/// Result type for core event operations
pub type EventResult<T> = Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_client_message_hides_ids() {
        let id = Uuid::new_v4();
        let err = EventError::ParticipantNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
        assert!(!err.client_message().contains(&id.to_string()));
    }

    #[test]
    fn test_game_mismatch_message() {
        let err = EventError::GameMismatch {
            participant: Uuid::new_v4(),
            expected: GameType::Jokeren,
            actual: GameType::Rikken,
        };
        assert_eq!(
            err.client_message(),
            "A Jokeren participant cannot sit at a Rikken table"
        );
    }
}
