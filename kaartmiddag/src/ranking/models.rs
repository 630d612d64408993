//! Ranking data models.

use serde::{Deserialize, Serialize};

use crate::constants::PODIUM_SIZE;
use crate::event::{GameType, ParticipantId};

/// One ranked participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// Finishing position (1-indexed, ties get consecutive positions)
    pub position: usize,
    pub participant_id: ParticipantId,
    pub name: String,
    /// Grand total over all rounds played
    pub total: i64,
    /// Total above zero earns a prize
    pub has_positive_prize: bool,
    /// Lowest total of the game earns the poedel prize
    pub is_bottom_prize: bool,
}

impl Standing {
    /// Whether this entry is on the podium
    pub fn is_podium(&self) -> bool {
        self.position <= PODIUM_SIZE
    }
}

/// Ranked list for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub game: GameType,
    pub entries: Vec<Standing>,
}

impl Standings {
    /// First three entries (fewer when the list is shorter)
    pub fn podium(&self) -> &[Standing] {
        &self.entries[..self.entries.len().min(PODIUM_SIZE)]
    }

    /// Entries from position four onwards
    pub fn unplaced(&self) -> &[Standing] {
        &self.entries[self.entries.len().min(PODIUM_SIZE)..]
    }

    pub fn winner(&self) -> Option<&Standing> {
        self.entries.first()
    }

    /// Everyone holding the poedel prize
    pub fn bottom(&self) -> impl Iterator<Item = &Standing> {
        self.entries.iter().filter(|s| s.is_bottom_prize)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Final results of an afternoon, one ranked list per game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    pub title: String,
    pub standings: Vec<Standings>,
}

impl Results {
    pub fn for_game(&self, game: GameType) -> Option<&Standings> {
        self.standings.iter().find(|s| s.game == game)
    }
}
