//! Event data models.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    str::FromStr,
};
use uuid::Uuid;

use super::names::normalize_name;
use crate::constants::{EVENT_DATE_FORMAT, MAX_ROUNDS};
use crate::errors::{EventError, EventResult};

/// Event ID type
pub type EventId = Uuid;

/// Participant ID type
pub type ParticipantId = Uuid;

/// Table ID type
pub type TableId = Uuid;

/// Round number (1-indexed)
pub type RoundNumber = u8;

/// The two card games played at an afternoon
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum GameType {
    Jokeren,
    Rikken,
}

impl GameType {
    pub const ALL: [GameType; 2] = [GameType::Jokeren, GameType::Rikken];

    /// The game a participant switches to
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Jokeren => Self::Rikken,
            Self::Rikken => Self::Jokeren,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jokeren => write!(f, "Jokeren"),
            Self::Rikken => write!(f, "Rikken"),
        }
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jokeren" | "j" => Ok(Self::Jokeren),
            "rikken" | "r" => Ok(Self::Rikken),
            other => Err(format!("unknown game '{other}' (expected jokeren or rikken)")),
        }
    }
}

/// Lifecycle status of an event, in strict forward order
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Registration,
    Round1,
    Round2,
    Results,
}

impl EventStatus {
    /// Number of rounds an event in this status holds
    #[must_use]
    pub const fn expected_rounds(self) -> usize {
        match self {
            Self::Registration => 0,
            Self::Round1 => 1,
            Self::Round2 | Self::Results => 2,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Registration => "REGISTRATION",
            Self::Round1 => "ROUND1",
            Self::Round2 => "ROUND2",
            Self::Results => "RESULTS",
        };
        write!(f, "{repr}")
    }
}

/// A registered player
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub game: GameType,
}

impl Participant {
    /// Create a participant with a fresh id. `name` is stored as given.
    pub fn new(name: impl Into<String>, game: GameType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            game,
        }
    }
}

/// A group of same-game participants seated together for a round
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: TableId,
    pub game: GameType,
    pub participant_ids: Vec<ParticipantId>,
}

impl Table {
    pub fn new(game: GameType, participant_ids: Vec<ParticipantId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            game,
            participant_ids,
        }
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participant_ids.contains(participant_id)
    }

    pub fn len(&self) -> usize {
        self.participant_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participant_ids.is_empty()
    }
}

/// One seating/scoring phase of an event
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    pub number: RoundNumber,
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Participant id to score. Missing entries count as zero.
    #[serde(default)]
    pub scores: BTreeMap<ParticipantId, i64>,
}

impl Round {
    pub fn new(number: RoundNumber) -> Self {
        Self {
            number,
            tables: Vec::new(),
            scores: BTreeMap::new(),
        }
    }

    /// Table currently holding the participant
    pub fn table_of(&self, participant_id: &ParticipantId) -> Option<&Table> {
        self.tables.iter().find(|t| t.contains(participant_id))
    }

    pub fn is_seated(&self, participant_id: &ParticipantId) -> bool {
        self.table_of(participant_id).is_some()
    }

    /// Tables of one game, in list order. Index + 1 is the table number.
    pub fn tables_for(&self, game: GameType) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(move |t| t.game == game)
    }

    /// Recorded score, if any
    pub fn score_of(&self, participant_id: &ParticipantId) -> Option<i64> {
        self.scores.get(participant_id).copied()
    }
}

/// A card afternoon
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardEvent {
    pub id: EventId,
    pub title: String,
    /// Creation date as shown to the operator (`d-m-yyyy`)
    pub date: String,
    pub status: EventStatus,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl CardEvent {
    /// Create an event in registration with a normalized title
    pub fn new(title: &str) -> EventResult<Self> {
        let title = normalize_name(title);
        if title.is_empty() {
            return Err(EventError::EmptyName);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            date: Local::now().format(EVENT_DATE_FORMAT).to_string(),
            status: EventStatus::Registration,
            participants: Vec::new(),
            rounds: Vec::new(),
        })
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> EventResult<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.id == participant_id)
            .ok_or(EventError::ParticipantNotFound(*participant_id))
    }

    /// Case-insensitive lookup on the normalized name
    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        let wanted = normalize_name(name).to_lowercase();
        self.participants
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Participants of one game, in registration order
    pub fn participants_of(&self, game: GameType) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.game == game)
    }

    pub fn round(&self, number: RoundNumber) -> EventResult<&Round> {
        self.rounds
            .iter()
            .find(|r| r.number == number)
            .ok_or(EventError::RoundNotReached(number))
    }

    pub(crate) fn round_mut(&mut self, number: RoundNumber) -> EventResult<&mut Round> {
        self.rounds
            .iter_mut()
            .find(|r| r.number == number)
            .ok_or(EventError::RoundNotReached(number))
    }

    /// Check every structural invariant of the event.
    ///
    /// Events built through the public operations always pass; this guards
    /// documents coming from outside (imports, storage).
    pub fn validate(&self) -> EventResult<()> {
        let invalid = |reason: String| EventError::InvalidEvent {
            event: self.id,
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(invalid("empty title".to_string()));
        }

        let mut ids = HashSet::with_capacity(self.participants.len());
        let mut names = HashSet::with_capacity(self.participants.len());
        for participant in &self.participants {
            if participant.name.trim().is_empty() {
                return Err(invalid("participant with empty name".to_string()));
            }
            if !ids.insert(participant.id) {
                return Err(invalid(format!("duplicate participant id {}", participant.id)));
            }
            if !names.insert(participant.name.to_lowercase()) {
                return Err(invalid(format!("duplicate name {}", participant.name)));
            }
        }

        if self.rounds.len() != self.status.expected_rounds() {
            return Err(invalid(format!(
                "{} rounds in status {}",
                self.rounds.len(),
                self.status
            )));
        }

        for (idx, round) in self.rounds.iter().enumerate() {
            if usize::from(round.number) != idx + 1 || round.number > MAX_ROUNDS {
                return Err(invalid(format!("unexpected round number {}", round.number)));
            }

            let mut seated = HashSet::new();
            for table in &round.tables {
                if table.is_empty() {
                    return Err(invalid(format!("empty table in round {}", round.number)));
                }
                for pid in &table.participant_ids {
                    let participant = self
                        .participant(pid)
                        .map_err(|_| invalid(format!("unknown participant {pid} seated")))?;
                    if participant.game != table.game {
                        return Err(invalid(format!(
                            "{} seated at a {} table",
                            participant.name, table.game
                        )));
                    }
                    if !seated.insert(*pid) {
                        return Err(invalid(format!(
                            "{} seated twice in round {}",
                            participant.name, round.number
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
