//! Command-line front end for running a card afternoon.
//!
//! The binary in `main.rs` parses arguments, opens the configured store and
//! hands a single [`commands::Command`] to a [`runner::Runner`].

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod runner;

pub use commands::{Command, ParseError, parse_command};
pub use config::{CliConfig, ConfigError, Overrides};
pub use runner::{RunError, Runner};
