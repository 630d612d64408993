//! Scoring engine: per-round score entry and totals.
//!
//! Scores are plain integers; negative and zero are valid outcomes. A
//! missing entry counts as zero, and a participant only collects a round's
//! score when seated at one of that round's tables.

use log::debug;

use crate::errors::EventResult;
use crate::event::{CardEvent, ParticipantId, Round, RoundNumber, Table};

/// Coerce operator input into a score.
///
/// Reads an optional sign and the leading digits, ignoring surrounding
/// whitespace and anything after the digits. Input without leading digits
/// (or that overflows) becomes 0.
///
/// ```
/// use kaartmiddag::scoring::parse_score;
///
/// assert_eq!(parse_score(" -12"), -12);
/// assert_eq!(parse_score("7 punten"), 7);
/// assert_eq!(parse_score("3.9"), 3);
/// assert_eq!(parse_score("abc"), 0);
/// ```
pub fn parse_score(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let Ok(value) = digits[..end].parse::<i64>() else {
        return 0;
    };

    if negative { -value } else { value }
}

/// Insert or replace one participant's score in a round
pub fn set_score(round: &Round, participant_id: ParticipantId, score: i64) -> Round {
    let mut next = round.clone();
    next.scores.insert(participant_id, score);
    next
}

/// Sum of the scores of everyone seated at `table`
pub fn table_total(table: &Table, round: &Round) -> i64 {
    table
        .participant_ids
        .iter()
        .map(|pid| round.score_of(pid).unwrap_or(0))
        .sum()
}

/// Score a participant collects in one round (zero when not seated)
pub fn round_score(participant_id: &ParticipantId, round: &Round) -> i64 {
    if round.is_seated(participant_id) {
        round.score_of(participant_id).unwrap_or(0)
    } else {
        0
    }
}

/// Sum of a participant's scores over all rounds played
pub fn participant_grand_total(participant_id: &ParticipantId, rounds: &[Round]) -> i64 {
    rounds.iter().map(|r| round_score(participant_id, r)).sum()
}

impl CardEvent {
    /// Record a score for a participant in a reached round.
    ///
    /// Also allowed after the results are in; table membership is untouched.
    pub fn set_score(
        &self,
        round: RoundNumber,
        participant_id: ParticipantId,
        score: i64,
    ) -> EventResult<Self> {
        self.participant(&participant_id)?;
        let updated = set_score(self.round(round)?, participant_id, score);

        debug!("Score {score} for {participant_id} in round {round}");
        let mut next = self.clone();
        *next.round_mut(round)? = updated;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EventError;
    use crate::event::GameType;
    use uuid::Uuid;

    #[test]
    fn test_parse_score_variants() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score("  +8"), 8);
        assert_eq!(parse_score("-0"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-"), 0);
        assert_eq!(parse_score("x12"), 0);
        assert_eq!(parse_score("99999999999999999999999"), 0);
    }

    #[test]
    fn test_set_score_replaces() {
        let pid = Uuid::new_v4();
        let round = set_score(&Round::new(1), pid, 5);
        let round = set_score(&round, pid, -3);
        assert_eq!(round.score_of(&pid), Some(-3));
        assert_eq!(round.scores.len(), 1);
    }

    #[test]
    fn test_table_total_defaults_missing_to_zero() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut round = Round::new(1);
        round.tables.push(Table::new(GameType::Rikken, vec![a, b, c]));
        round.scores.insert(a, 10);
        round.scores.insert(b, -4);
        assert_eq!(table_total(&round.tables[0], &round), 6);
    }

    #[test]
    fn test_grand_total_skips_unseated_rounds() {
        let pid = Uuid::new_v4();
        let mut first = Round::new(1);
        first.tables.push(Table::new(GameType::Jokeren, vec![pid]));
        first.scores.insert(pid, 7);
        let mut second = Round::new(2);
        second.scores.insert(pid, 100);

        assert_eq!(participant_grand_total(&pid, &[first.clone()]), 7);
        assert_eq!(participant_grand_total(&pid, &[first, second]), 7);
        assert_eq!(participant_grand_total(&pid, &[]), 0);
    }

    #[test]
    fn test_event_set_score_keeps_tables() {
        let event = CardEvent::new("x")
            .unwrap()
            .add_participant("A", GameType::Jokeren)
            .unwrap()
            .advance()
            .unwrap();
        let a = event.participants[0].id;
        let event = event
            .set_round_tables(1, vec![Table::new(GameType::Jokeren, vec![a])])
            .unwrap();

        let next = event.set_score(1, a, -20).unwrap();
        assert_eq!(next.rounds[0].score_of(&a), Some(-20));
        assert_eq!(next.rounds[0].tables, event.rounds[0].tables);
    }

    #[test]
    fn test_event_set_score_rejects_unknown() {
        let event = CardEvent::new("x")
            .unwrap()
            .add_participant("A", GameType::Jokeren)
            .unwrap();
        let a = event.participants[0].id;
        assert_eq!(
            event.set_score(1, a, 1).unwrap_err(),
            EventError::RoundNotReached(1)
        );
        assert!(matches!(
            event.set_score(1, Uuid::new_v4(), 1),
            Err(EventError::ParticipantNotFound(_))
        ));
    }
}
