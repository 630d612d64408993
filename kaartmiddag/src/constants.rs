//! Shared constants for the card afternoon engine.

/// Number of seating rounds in one afternoon.
pub const MAX_ROUNDS: u8 = 2;

/// Default number of seats at a table, for both game types.
pub const DEFAULT_TABLE_CAPACITY: usize = 4;

/// Largest table capacity accepted by configuration.
pub const MAX_TABLE_CAPACITY: usize = 12;

/// Number of ranked entries shown on the podium.
pub const PODIUM_SIZE: usize = 3;

/// Prefix of the suggested export file name.
pub const EXPORT_FILE_PREFIX: &str = "kaartavond_gegevens";

/// Date format the event `date` field is stored in (Dutch short date).
pub const EVENT_DATE_FORMAT: &str = "%-d-%-m-%Y";
