//! Table assignment engine.
//!
//! This module provides:
//! - Balanced bulk planning of a round's tables per game
//! - Roster shuffling before planning
//! - Manual reassignment by positional table number
//!
//! ## Example
//!
//! ```
//! use kaartmiddag::event::{CardEvent, GameType};
//! use kaartmiddag::seating::{SeatRandomizer, SeatingConfig, plan_round};
//!
//! let event = CardEvent::new("15 februari").unwrap()
//!     .add_participant("Anita Krete", GameType::Jokeren).unwrap()
//!     .add_participant("Bart van Esch", GameType::Rikken).unwrap()
//!     .advance().unwrap();
//!
//! let tables = plan_round(&event, &SeatingConfig::default(), &mut SeatRandomizer::new());
//! let event = event.set_round_tables(1, tables).unwrap();
//! assert_eq!(event.rounds[0].tables.len(), 2);
//! ```

pub mod moves;
pub mod planner;
pub mod randomizer;

pub use moves::{move_participant, table_number};
pub use planner::{SeatingConfig, plan_round, plan_tables};
pub use randomizer::SeatRandomizer;
