//! Bulk table planning for a round.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::randomizer::SeatRandomizer;
use crate::constants::{DEFAULT_TABLE_CAPACITY, MAX_TABLE_CAPACITY};
use crate::event::{CardEvent, GameType, ParticipantId, Table};

/// Seating configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingConfig {
    /// Seats per Jokeren table
    pub jokeren_capacity: usize,

    /// Seats per Rikken table
    pub rikken_capacity: usize,

    /// Shuffle each roster before splitting it into tables
    pub shuffle: bool,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            jokeren_capacity: DEFAULT_TABLE_CAPACITY,
            rikken_capacity: DEFAULT_TABLE_CAPACITY,
            shuffle: true,
        }
    }
}

impl SeatingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for game in GameType::ALL {
            let capacity = self.capacity(game);
            if capacity == 0 || capacity > MAX_TABLE_CAPACITY {
                return Err(format!(
                    "{game} table capacity must be between 1 and {MAX_TABLE_CAPACITY}"
                ));
            }
        }
        Ok(())
    }

    pub fn capacity(&self, game: GameType) -> usize {
        match game {
            GameType::Jokeren => self.jokeren_capacity,
            GameType::Rikken => self.rikken_capacity,
        }
    }

    /// Use the same capacity for both games
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.jokeren_capacity = capacity;
        self.rikken_capacity = capacity;
        self
    }
}

/// Split one game's roster into tables of near-equal size.
///
/// Uses `ceil(n / capacity)` tables; sizes differ by at most one and the
/// larger tables come first. A capacity of zero is treated as one.
pub fn plan_tables(roster: &[ParticipantId], game: GameType, capacity: usize) -> Vec<Table> {
    if roster.is_empty() {
        return Vec::new();
    }

    let capacity = capacity.max(1);
    let table_count = roster.len().div_ceil(capacity);
    let base = roster.len() / table_count;
    let extra = roster.len() % table_count;

    let mut tables = Vec::with_capacity(table_count);
    let mut rest = roster;
    for idx in 0..table_count {
        let size = if idx < extra { base + 1 } else { base };
        let (seats, remaining) = rest.split_at(size);
        tables.push(Table::new(game, seats.to_vec()));
        rest = remaining;
    }
    tables
}

/// Plan a full table set (both games) for every participant of `event`.
pub fn plan_round<R: Rng>(
    event: &CardEvent,
    config: &SeatingConfig,
    randomizer: &mut SeatRandomizer<R>,
) -> Vec<Table> {
    GameType::ALL
        .into_iter()
        .flat_map(|game| {
            let roster: Vec<ParticipantId> = event.participants_of(game).map(|p| p.id).collect();
            let roster = if config.shuffle {
                randomizer.shuffle_roster(&roster)
            } else {
                roster
            };
            plan_tables(&roster, game, config.capacity(game))
        })
        .collect()
}
