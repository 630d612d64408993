//! Manual table reassignment.
//!
//! Table numbers are positional: table `n` of a game is the `n`-th table of
//! that game in the round's list at the moment of lookup. They are never
//! stored, since pruning an emptied table renumbers the ones after it.

use log::debug;
use std::collections::HashSet;

use crate::errors::{EventError, EventResult};
use crate::event::{CardEvent, GameType, ParticipantId, RoundNumber, Table};

/// 1-based number of the table holding `participant_id`, counted among the
/// tables of that table's game.
pub fn table_number(tables: &[Table], participant_id: &ParticipantId) -> Option<usize> {
    let table = tables.iter().find(|t| t.contains(participant_id))?;
    tables
        .iter()
        .filter(|t| t.game == table.game)
        .position(|t| t.id == table.id)
        .map(|idx| idx + 1)
}

/// Move a participant to table `number` of `game`.
///
/// The participant leaves their current table, emptied tables are dropped,
/// and they join the table at that position, or a new table appended to
/// the list when no such position exists. Never fails.
pub fn move_participant(
    tables: &[Table],
    participant_id: ParticipantId,
    game: GameType,
    number: usize,
) -> Vec<Table> {
    let already_there = tables
        .iter()
        .find(|t| t.contains(&participant_id))
        .is_some_and(|t| t.game == game)
        && table_number(tables, &participant_id) == Some(number);
    if already_there {
        return tables.iter().filter(|t| !t.is_empty()).cloned().collect();
    }

    let mut next: Vec<Table> = tables
        .iter()
        .map(|table| {
            let mut table = table.clone();
            table.participant_ids.retain(|id| id != &participant_id);
            table
        })
        .filter(|t| !t.is_empty())
        .collect();

    let target = number.checked_sub(1).and_then(|wanted| {
        next.iter()
            .enumerate()
            .filter(|(_, t)| t.game == game)
            .nth(wanted)
            .map(|(idx, _)| idx)
    });

    match target {
        Some(idx) => next[idx].participant_ids.push(participant_id),
        None => next.push(Table::new(game, vec![participant_id])),
    }
    next
}

/// Drop empty tables and check the seating invariants against `event`.
pub(crate) fn checked_tables(event: &CardEvent, tables: Vec<Table>) -> EventResult<Vec<Table>> {
    let mut seated = HashSet::new();
    for table in &tables {
        for pid in &table.participant_ids {
            let participant = event.participant(pid)?;
            if participant.game != table.game {
                return Err(EventError::GameMismatch {
                    participant: *pid,
                    expected: participant.game,
                    actual: table.game,
                });
            }
            if !seated.insert(*pid) {
                return Err(EventError::DoubleSeated(*pid));
            }
        }
    }

    Ok(tables.into_iter().filter(|t| !t.is_empty()).collect())
}

impl CardEvent {
    /// Reassign one participant within a reached round.
    pub fn move_participant(
        &self,
        round: RoundNumber,
        participant_id: ParticipantId,
        number: usize,
    ) -> EventResult<Self> {
        let game = self.participant(&participant_id)?.game;
        let current = self.round(round)?;
        let tables = move_participant(&current.tables, participant_id, game, number);

        debug!("Moved {participant_id} to {game} table {number} in round {round}");
        let mut next = self.clone();
        next.round_mut(round)?.tables = tables;
        Ok(next)
    }

    /// Replace a reached round's tables with a confirmed assignment.
    pub fn set_round_tables(&self, round: RoundNumber, tables: Vec<Table>) -> EventResult<Self> {
        self.round(round)?;
        let tables = checked_tables(self, tables)?;

        let mut next = self.clone();
        next.round_mut(round)?.tables = tables;
        Ok(next)
    }
}
