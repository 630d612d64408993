//! Event entity model: events, participants, tables and rounds.
//!
//! Names and titles are normalized with [`normalize_name`] so that
//! uniqueness checks compare like with like.

pub mod entities;
pub mod names;
pub mod registration;

pub use entities::{
    CardEvent, EventId, EventStatus, GameType, Participant, ParticipantId, Round, RoundNumber,
    Table, TableId,
};
pub use names::{BuiltinNames, NameBook, normalize_name};
