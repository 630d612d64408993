//! # Kaartmiddag
//!
//! Event management for a recurring card afternoon where two games,
//! Jokeren and Rikken, are played side by side over two seating rounds.
//!
//! Every core operation takes an immutable [`CardEvent`] and returns a new
//! one, or an [`EventError`] when the operation is rejected. Nothing is
//! mutated in place, so a rejected operation is always a no-op.
//!
//! ## Lifecycle
//!
//! - **Registration**: participants join one of the two games
//! - **Round 1**: tables are drawn or moved by hand, scores are entered
//! - **Round 2**: same again, round 1 stays editable
//! - **Results**: standings per game with prize and poedel prize flags
//!
//! ## Core Modules
//!
//! - [`event`]: entities, name normalization and registration
//! - [`seating`]: table planning and manual moves
//! - [`scoring`]: score entry and totals
//! - [`ranking`]: standings and prizes
//! - [`lifecycle`]: the status state machine
//! - [`service`]: state ownership on top of a [`storage`] backend
//!
//! ## Example
//!
//! ```
//! use kaartmiddag::{CardEvent, GameType, Table};
//!
//! let event = CardEvent::new("najaarsmiddag").unwrap()
//!     .add_participant("anita krete", GameType::Jokeren).unwrap()
//!     .advance().unwrap();
//! let anita = event.participants[0].id;
//!
//! let event = event
//!     .set_round_tables(1, vec![Table::new(GameType::Jokeren, vec![anita])]).unwrap()
//!     .set_score(1, anita, 42).unwrap();
//!
//! let results = event.results();
//! let jokeren = results.for_game(GameType::Jokeren).unwrap();
//! assert_eq!(jokeren.entries[0].name, "Anita Krete");
//! assert!(jokeren.entries[0].has_positive_prize);
//! ```

pub mod constants;
pub mod errors;

/// Entities, names and registration.
pub mod event;
pub use event::{
    BuiltinNames, CardEvent, EventId, EventStatus, GameType, NameBook, Participant,
    ParticipantId, Round, RoundNumber, Table, TableId, normalize_name,
};

pub mod lifecycle;
pub mod ranking;
pub mod scoring;
pub mod seating;

pub mod service;
pub mod state;
pub mod storage;
pub mod transfer;

pub use errors::{EventError, EventResult};
pub use lifecycle::RoundPhase;
pub use ranking::{Results, Standing, Standings};
pub use service::{EventService, ServiceError, ServiceResult};
pub use state::{AppState, Change, Intent, Outcome};
