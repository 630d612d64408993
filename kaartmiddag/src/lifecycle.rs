//! Event lifecycle state machine.
//!
//! `REGISTRATION -> ROUND1 -> ROUND2 -> RESULTS`, forward only. Each
//! transition into a round appends that round; nothing else creates rounds.
//! Resetting a round's tables is local to the round and leaves the status
//! alone.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{EventError, EventResult};
use crate::event::{CardEvent, EventStatus, Round, RoundNumber};

/// Seating sub-state of a reached round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No tables yet (or tables were reset)
    Unassigned,
    /// Tables are set; scores can be entered
    Seated,
}

impl RoundPhase {
    pub fn of(round: &Round) -> Self {
        if round.tables.is_empty() {
            Self::Unassigned
        } else {
            Self::Seated
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::Seated => write!(f, "seated"),
        }
    }
}

impl EventStatus {
    /// Next status, or `None` once the results are in
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Registration => Some(Self::Round1),
            Self::Round1 => Some(Self::Round2),
            Self::Round2 => Some(Self::Results),
            Self::Results => None,
        }
    }

    /// Round played in this status, if any
    #[must_use]
    pub const fn current_round(self) -> Option<RoundNumber> {
        match self {
            Self::Round1 => Some(1),
            Self::Round2 => Some(2),
            Self::Registration | Self::Results => None,
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Results)
    }
}

impl CardEvent {
    /// Move the event one step forward.
    ///
    /// Starting round 1 requires at least one participant. Finishing a round
    /// is unconditional, even with missing scores or no tables.
    pub fn advance(&self) -> EventResult<Self> {
        let next_status = self.status.next().ok_or(EventError::AlreadyFinished)?;
        if self.status == EventStatus::Registration && self.participants.is_empty() {
            return Err(EventError::NoParticipants);
        }

        let mut next = self.clone();
        next.status = next_status;
        if let Some(number) = next_status.current_round() {
            next.rounds.push(Round::new(number));
        }

        info!("{} moved from {} to {}", self.title, self.status, next_status);
        Ok(next)
    }

    /// Clear a reached round's tables. Scores stay recorded.
    pub fn reset_tables(&self, round: RoundNumber) -> EventResult<Self> {
        self.round(round)?;

        let mut next = self.clone();
        next.round_mut(round)?.tables.clear();
        info!("{}: tables of round {round} reset", self.title);
        Ok(next)
    }

    /// Seating sub-state of a reached round
    pub fn round_phase(&self, round: RoundNumber) -> EventResult<RoundPhase> {
        self.round(round).map(RoundPhase::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GameType, Table};

    fn with_players() -> CardEvent {
        CardEvent::new("Zondag")
            .unwrap()
            .add_participant("A", GameType::Jokeren)
            .unwrap()
            .add_participant("B", GameType::Rikken)
            .unwrap()
    }

    #[test]
    fn test_full_walk_matches_round_counts() {
        let mut event = with_players();
        let expected = [
            (EventStatus::Round1, 1),
            (EventStatus::Round2, 2),
            (EventStatus::Results, 2),
        ];
        for (status, rounds) in expected {
            event = event.advance().unwrap();
            assert_eq!(event.status, status);
            assert_eq!(event.rounds.len(), rounds);
            assert_eq!(event.rounds.len(), status.expected_rounds());
        }
        assert_eq!(event.rounds[1].number, 2);
        assert_eq!(event.advance().unwrap_err(), EventError::AlreadyFinished);
    }

    #[test]
    fn test_start_requires_participant() {
        let event = CardEvent::new("Leeg").unwrap();
        assert_eq!(event.advance().unwrap_err(), EventError::NoParticipants);
    }

    #[test]
    fn test_round_two_without_scores_is_allowed() {
        let event = with_players().advance().unwrap();
        assert!(event.rounds[0].scores.is_empty());
        assert_eq!(event.advance().unwrap().status, EventStatus::Round2);
    }

    #[test]
    fn test_status_order_is_monotonic() {
        let mut status = EventStatus::Registration;
        while let Some(next) = status.next() {
            assert!(next > status);
            status = next;
        }
        assert!(status.is_finished());
    }

    #[test]
    fn test_reset_round_one_during_round_two_keeps_scores() {
        let event = with_players().advance().unwrap();
        let a = event.participants[0].id;
        let event = event
            .set_round_tables(1, vec![Table::new(GameType::Jokeren, vec![a])])
            .unwrap()
            .set_score(1, a, 15)
            .unwrap()
            .advance()
            .unwrap();
        assert_eq!(event.round_phase(1).unwrap(), RoundPhase::Seated);

        let reset = event.reset_tables(1).unwrap();
        assert!(reset.rounds[0].tables.is_empty());
        assert_eq!(reset.rounds[0].scores, event.rounds[0].scores);
        assert_eq!(reset.status, EventStatus::Round2);
        assert_eq!(reset.round_phase(1).unwrap(), RoundPhase::Unassigned);
    }

    #[test]
    fn test_reset_unreached_round() {
        let event = with_players().advance().unwrap();
        assert_eq!(
            event.reset_tables(2).unwrap_err(),
            EventError::RoundNotReached(2)
        );
    }
}
