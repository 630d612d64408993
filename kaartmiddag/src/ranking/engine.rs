//! Ranking and prize computation.

use std::cmp::Reverse;

use super::models::{Results, Standing, Standings};
use crate::event::{CardEvent, GameType, Participant, Round};
use crate::scoring::participant_grand_total;

/// Rank one game's participants by grand total, highest first.
///
/// The sort is stable: participants with equal totals keep their input
/// order. Prize flags are independent, so when every total is equal and
/// positive each entry holds both.
pub fn rank(participants: &[Participant], rounds: &[Round], game: GameType) -> Standings {
    let mut totals: Vec<(&Participant, i64)> = participants
        .iter()
        .filter(|p| p.game == game)
        .map(|p| (p, participant_grand_total(&p.id, rounds)))
        .collect();
    totals.sort_by_key(|(_, total)| Reverse(*total));

    let min_total = totals.iter().map(|(_, total)| *total).min();
    let entries = totals
        .into_iter()
        .enumerate()
        .map(|(idx, (participant, total))| Standing {
            position: idx + 1,
            participant_id: participant.id,
            name: participant.name.clone(),
            total,
            has_positive_prize: total > 0,
            is_bottom_prize: Some(total) == min_total,
        })
        .collect();

    Standings { game, entries }
}

impl CardEvent {
    /// Standings for both games
    pub fn results(&self) -> Results {
        Results {
            title: self.title.clone(),
            standings: GameType::ALL
                .into_iter()
                .map(|game| rank(&self.participants, &self.rounds, game))
                .collect(),
        }
    }
}
