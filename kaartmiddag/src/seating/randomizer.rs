//! Seat randomization so table draws don't follow registration order.

use rand::{Rng, rngs::ThreadRng, seq::SliceRandom};

use crate::event::ParticipantId;

/// Shuffles rosters before they are split into tables
pub struct SeatRandomizer<R: Rng = ThreadRng> {
    rng: R,
}

impl SeatRandomizer<ThreadRng> {
    /// Create a randomizer backed by the thread-local generator
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for SeatRandomizer<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SeatRandomizer<R> {
    /// Create a randomizer from a specific generator (seeded in tests)
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Return the roster in random order
    pub fn shuffle_roster(&mut self, roster: &[ParticipantId]) -> Vec<ParticipantId> {
        let mut shuffled = roster.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled
    }
}
