//! Ranking and prize engine.
//!
//! Participants are ranked per game by grand total. Two independent prize
//! flags are derived for every entry:
//! - **Prize**: total above zero
//! - **Poedel prize**: lowest total of the game (shared on ties)
//!
//! The first three entries form the podium.

pub mod engine;
pub mod models;

pub use engine::rank;
pub use models::{Results, Standing, Standings};
