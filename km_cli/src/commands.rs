use kaartmiddag::constants::MAX_ROUNDS;
use kaartmiddag::scoring::parse_score;
use kaartmiddag::{GameType, RoundNumber};
use std::fmt;
use std::path::PathBuf;

/// One `km` invocation.
///
/// Events are referenced by id prefix or title, participants by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events,
    Create {
        title: String,
    },
    Delete {
        event: String,
    },
    Show {
        event: String,
    },
    Add {
        event: String,
        game: GameType,
        name: String,
    },
    Remove {
        event: String,
        name: String,
    },
    /// Move a participant to the other game
    Switch {
        event: String,
        name: String,
    },
    /// Draw all tables of a round at once
    Seat {
        event: String,
        round: RoundNumber,
        capacity: Option<usize>,
        shuffle: bool,
    },
    Move {
        event: String,
        round: RoundNumber,
        name: String,
        table: usize,
    },
    Score {
        event: String,
        round: RoundNumber,
        name: String,
        score: i64,
    },
    Reset {
        event: String,
        round: RoundNumber,
    },
    Advance {
        event: String,
    },
    Results {
        event: String,
    },
    Names {
        game: GameType,
        prefix: Option<String>,
    },
    Export {
        file: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
    },
}

impl Command {
    /// Name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Create { .. } => "create",
            Self::Delete { .. } => "delete",
            Self::Show { .. } => "show",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Switch { .. } => "switch",
            Self::Seat { .. } => "seat",
            Self::Move { .. } => "move",
            Self::Score { .. } => "score",
            Self::Reset { .. } => "reset",
            Self::Advance { .. } => "advance",
            Self::Results { .. } => "results",
            Self::Names { .. } => "names",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
        }
    }

    /// Event reference, for commands that target one event
    pub fn event_ref(&self) -> Option<&str> {
        match self {
            Self::Delete { event }
            | Self::Show { event }
            | Self::Add { event, .. }
            | Self::Remove { event, .. }
            | Self::Switch { event, .. }
            | Self::Seat { event, .. }
            | Self::Move { event, .. }
            | Self::Score { event, .. }
            | Self::Reset { event, .. }
            | Self::Advance { event }
            | Self::Results { event } => Some(event),
            _ => None,
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No command given.
    Empty,
    /// Required argument missing; carries the usage line.
    MissingArgument(&'static str),
    /// Round is not a number between 1 and the last round.
    InvalidRound(String),
    /// Table number is not a positive number.
    InvalidTableNumber(String),
    /// Game is neither Jokeren nor Rikken.
    InvalidGame(String),
    /// Capacity flag without a positive number.
    InvalidCapacity(String),
    /// Extra or unknown argument.
    UnexpectedArgument(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No command given. Run 'km --help' to see available commands"),
            Self::MissingArgument(usage) => write!(f, "Missing argument. Usage: km {usage}"),
            Self::InvalidRound(value) => write!(
                f,
                "Invalid round '{value}'. Must be a number from 1 to {MAX_ROUNDS}"
            ),
            Self::InvalidTableNumber(value) => write!(
                f,
                "Invalid table number '{value}'. Must be 1 or higher (e.g., 'move vrijdag 1 Anita 2')"
            ),
            Self::InvalidGame(value) => {
                write!(f, "Invalid game '{value}'. Use 'jokeren' or 'rikken'")
            }
            Self::InvalidCapacity(value) => write!(
                f,
                "Invalid capacity '{value}'. Must be a positive number (e.g., '--capacity 4')"
            ),
            Self::UnexpectedArgument(value) => write!(f, "Unexpected argument '{value}'"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Run 'km --help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

const USAGE_CREATE: &str = "create <title>";
const USAGE_DELETE: &str = "delete <event>";
const USAGE_SHOW: &str = "show <event>";
const USAGE_ADD: &str = "add <event> <jokeren|rikken> <name>";
const USAGE_REMOVE: &str = "remove <event> <name>";
const USAGE_SWITCH: &str = "switch <event> <name>";
const USAGE_SEAT: &str = "seat <event> <round> [--capacity N] [--no-shuffle]";
const USAGE_MOVE: &str = "move <event> <round> <name> <table>";
const USAGE_SCORE: &str = "score <event> <round> <name> <value>";
const USAGE_RESET: &str = "reset <event> <round>";
const USAGE_ADVANCE: &str = "advance <event>";
const USAGE_RESULTS: &str = "results <event>";
const USAGE_NAMES: &str = "names <jokeren|rikken> [prefix]";
const USAGE_IMPORT: &str = "import <file>";

/// Parse the free arguments of one invocation into a [`Command`].
///
/// Multi-word names may be passed quoted or as separate words.
///
/// # Examples
///
/// ```
/// use km_cli::commands::{Command, parse_command};
///
/// assert_eq!(parse_command(&["events"]), Ok(Command::Events));
/// assert!(matches!(
///     parse_command(&["score", "vrijdag", "1", "Anita", "Krete", "12"]),
///     Ok(Command::Score { round: 1, score: 12, .. })
/// ));
/// ```
pub fn parse_command<S: AsRef<str>>(args: &[S]) -> Result<Command, ParseError> {
    let parts: Vec<&str> = args
        .iter()
        .map(|a| a.as_ref().trim())
        .filter(|a| !a.is_empty())
        .collect();
    let Some((&head, rest)) = parts.split_first() else {
        return Err(ParseError::Empty);
    };

    match head.to_lowercase().as_str() {
        "events" | "list" => no_more(rest).map(|()| Command::Events),
        "create" => Ok(Command::Create {
            title: joined(rest, USAGE_CREATE)?,
        }),
        "delete" => single_event(rest, USAGE_DELETE).map(|event| Command::Delete { event }),
        "show" => single_event(rest, USAGE_SHOW).map(|event| Command::Show { event }),
        "add" => parse_add(rest),
        "remove" => {
            let (event, rest) = event_and_rest(rest, USAGE_REMOVE)?;
            Ok(Command::Remove {
                event,
                name: joined(rest, USAGE_REMOVE)?,
            })
        }
        "switch" => {
            let (event, rest) = event_and_rest(rest, USAGE_SWITCH)?;
            Ok(Command::Switch {
                event,
                name: joined(rest, USAGE_SWITCH)?,
            })
        }
        "seat" => parse_seat(rest),
        "move" => parse_move(rest),
        "score" => parse_score_command(rest),
        "reset" => {
            let (event, rest) = event_and_rest(rest, USAGE_RESET)?;
            let (round, rest) = round_and_rest(rest, USAGE_RESET)?;
            no_more(rest)?;
            Ok(Command::Reset { event, round })
        }
        "advance" | "next" => {
            single_event(rest, USAGE_ADVANCE).map(|event| Command::Advance { event })
        }
        "results" => single_event(rest, USAGE_RESULTS).map(|event| Command::Results { event }),
        "names" => {
            let (game, rest) = rest.split_first().ok_or(ParseError::MissingArgument(USAGE_NAMES))?;
            Ok(Command::Names {
                game: parse_game(game)?,
                prefix: (!rest.is_empty()).then(|| rest.join(" ")),
            })
        }
        "export" => match rest {
            [] => Ok(Command::Export { file: None }),
            [file] => Ok(Command::Export {
                file: Some(PathBuf::from(file)),
            }),
            [_, extra, ..] => Err(ParseError::UnexpectedArgument(extra.to_string())),
        },
        "import" => match rest {
            [file] => Ok(Command::Import {
                file: PathBuf::from(file),
            }),
            [] => Err(ParseError::MissingArgument(USAGE_IMPORT)),
            [_, extra, ..] => Err(ParseError::UnexpectedArgument(extra.to_string())),
        },
        _ => Err(ParseError::UnrecognizedCommand(head.to_string())),
    }
}

/// Parse an add command: "add <event> <game> <name...>"
fn parse_add(parts: &[&str]) -> Result<Command, ParseError> {
    let (event, rest) = event_and_rest(parts, USAGE_ADD)?;
    let (game, rest) = rest.split_first().ok_or(ParseError::MissingArgument(USAGE_ADD))?;
    Ok(Command::Add {
        event,
        game: parse_game(game)?,
        name: joined(rest, USAGE_ADD)?,
    })
}

/// Parse a seat command: "seat <event> <round> [--capacity N] [--no-shuffle]"
fn parse_seat(parts: &[&str]) -> Result<Command, ParseError> {
    let (event, rest) = event_and_rest(parts, USAGE_SEAT)?;
    let (round, mut rest) = round_and_rest(rest, USAGE_SEAT)?;

    let mut capacity = None;
    let mut shuffle = true;
    while let Some((&flag, tail)) = rest.split_first() {
        match flag {
            "--no-shuffle" => {
                shuffle = false;
                rest = tail;
            }
            "--capacity" => {
                let (value, tail) = tail
                    .split_first()
                    .ok_or(ParseError::MissingArgument(USAGE_SEAT))?;
                let parsed = value
                    .parse::<usize>()
                    .ok()
                    .filter(|c| *c > 0)
                    .ok_or_else(|| ParseError::InvalidCapacity(value.to_string()))?;
                capacity = Some(parsed);
                rest = tail;
            }
            other => return Err(ParseError::UnexpectedArgument(other.to_string())),
        }
    }

    Ok(Command::Seat {
        event,
        round,
        capacity,
        shuffle,
    })
}

/// Parse a move command: "move <event> <round> <name...> <table>"
fn parse_move(parts: &[&str]) -> Result<Command, ParseError> {
    let (event, rest) = event_and_rest(parts, USAGE_MOVE)?;
    let (round, rest) = round_and_rest(rest, USAGE_MOVE)?;
    let (table, name) = rest
        .split_last()
        .filter(|(_, name)| !name.is_empty())
        .ok_or(ParseError::MissingArgument(USAGE_MOVE))?;

    let table = table
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::InvalidTableNumber(table.to_string()))?;

    Ok(Command::Move {
        event,
        round,
        name: name.join(" "),
        table,
    })
}

/// Parse a score command: "score <event> <round> <name...> <value>"
///
/// The value is coerced: anything without leading digits scores 0.
fn parse_score_command(parts: &[&str]) -> Result<Command, ParseError> {
    let (event, rest) = event_and_rest(parts, USAGE_SCORE)?;
    let (round, rest) = round_and_rest(rest, USAGE_SCORE)?;
    let (value, name) = rest
        .split_last()
        .filter(|(_, name)| !name.is_empty())
        .ok_or(ParseError::MissingArgument(USAGE_SCORE))?;

    Ok(Command::Score {
        event,
        round,
        name: name.join(" "),
        score: parse_score(value),
    })
}

fn parse_game(raw: &str) -> Result<GameType, ParseError> {
    raw.parse()
        .map_err(|_| ParseError::InvalidGame(raw.to_string()))
}

fn event_and_rest<'a, 'b>(
    parts: &'a [&'b str],
    usage: &'static str,
) -> Result<(String, &'a [&'b str]), ParseError> {
    parts
        .split_first()
        .map(|(event, rest)| (event.to_string(), rest))
        .ok_or(ParseError::MissingArgument(usage))
}

fn round_and_rest<'a, 'b>(
    parts: &'a [&'b str],
    usage: &'static str,
) -> Result<(RoundNumber, &'a [&'b str]), ParseError> {
    let (raw, rest) = parts
        .split_first()
        .ok_or(ParseError::MissingArgument(usage))?;
    let round = raw
        .parse::<RoundNumber>()
        .ok()
        .filter(|r| (1..=MAX_ROUNDS).contains(r))
        .ok_or_else(|| ParseError::InvalidRound(raw.to_string()))?;
    Ok((round, rest))
}

fn single_event(parts: &[&str], usage: &'static str) -> Result<String, ParseError> {
    let (event, rest) = event_and_rest(parts, usage)?;
    no_more(rest)?;
    Ok(event)
}

fn joined(parts: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if parts.is_empty() {
        return Err(ParseError::MissingArgument(usage));
    }
    Ok(parts.join(" "))
}

fn no_more(parts: &[&str]) -> Result<(), ParseError> {
    match parts.first() {
        Some(extra) => Err(ParseError::UnexpectedArgument(extra.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseError> {
        let args: Vec<&str> = line.split_ascii_whitespace().collect();
        parse_command(&args)
    }

    // === Simple commands ===

    #[test]
    fn test_parse_events() {
        assert_eq!(parse("events"), Ok(Command::Events));
        assert_eq!(parse("LIST"), Ok(Command::Events));
        assert_eq!(
            parse("events now"),
            Err(ParseError::UnexpectedArgument("now".to_string()))
        );
    }

    #[test]
    fn test_parse_create_joins_title() {
        assert_eq!(
            parse("create 15 februari"),
            Ok(Command::Create {
                title: "15 februari".to_string()
            })
        );
        assert_eq!(
            parse("create"),
            Err(ParseError::MissingArgument(USAGE_CREATE))
        );
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse("add vrijdag j anita krete"),
            Ok(Command::Add {
                event: "vrijdag".to_string(),
                game: GameType::Jokeren,
                name: "anita krete".to_string(),
            })
        );
        assert_eq!(
            parse("add vrijdag poker anita"),
            Err(ParseError::InvalidGame("poker".to_string()))
        );
        assert_eq!(
            parse("add vrijdag rikken"),
            Err(ParseError::MissingArgument(USAGE_ADD))
        );
    }

    // === Round-scoped commands ===

    #[test]
    fn test_parse_seat_flags() {
        assert_eq!(
            parse("seat vrijdag 2 --capacity 5 --no-shuffle"),
            Ok(Command::Seat {
                event: "vrijdag".to_string(),
                round: 2,
                capacity: Some(5),
                shuffle: false,
            })
        );
        assert_eq!(
            parse("seat vrijdag 1 --capacity 0"),
            Err(ParseError::InvalidCapacity("0".to_string()))
        );
        assert_eq!(
            parse("seat vrijdag 1 --fast"),
            Err(ParseError::UnexpectedArgument("--fast".to_string()))
        );
    }

    #[test]
    fn test_parse_round_bounds() {
        assert_eq!(
            parse("reset vrijdag 3"),
            Err(ParseError::InvalidRound("3".to_string()))
        );
        assert_eq!(
            parse("reset vrijdag 0"),
            Err(ParseError::InvalidRound("0".to_string()))
        );
        assert_eq!(
            parse("reset vrijdag 1"),
            Ok(Command::Reset {
                event: "vrijdag".to_string(),
                round: 1
            })
        );
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            parse("move vrijdag 1 Bart van Esch 3"),
            Ok(Command::Move {
                event: "vrijdag".to_string(),
                round: 1,
                name: "Bart van Esch".to_string(),
                table: 3,
            })
        );
        assert_eq!(
            parse("move vrijdag 1 Bart 0"),
            Err(ParseError::InvalidTableNumber("0".to_string()))
        );
        assert_eq!(
            parse("move vrijdag 1 3"),
            Err(ParseError::MissingArgument(USAGE_MOVE))
        );
    }

    #[test]
    fn test_parse_score_coerces_value() {
        assert!(matches!(
            parse("score vrijdag 2 Anita -15"),
            Ok(Command::Score { round: 2, score: -15, .. })
        ));
        assert!(matches!(
            parse("score vrijdag 2 Anita veel"),
            Ok(Command::Score { score: 0, .. })
        ));
    }

    // === Misc ===

    #[test]
    fn test_parse_names_and_transfer() {
        assert_eq!(
            parse("names rikken bar"),
            Ok(Command::Names {
                game: GameType::Rikken,
                prefix: Some("bar".to_string()),
            })
        );
        assert_eq!(parse("export"), Ok(Command::Export { file: None }));
        assert_eq!(
            parse("import"),
            Err(ParseError::MissingArgument(USAGE_IMPORT))
        );
    }

    #[test]
    fn test_parse_quoted_args() {
        let args = vec!["add".to_string(), "Vrijdag Middag".to_string(), "r".to_string(), "Kees van Esch".to_string()];
        assert_eq!(
            parse_command(&args),
            Ok(Command::Add {
                event: "Vrijdag Middag".to_string(),
                game: GameType::Rikken,
                name: "Kees van Esch".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(parse_command(&empty), Err(ParseError::Empty));
        assert_eq!(
            parse("deal"),
            Err(ParseError::UnrecognizedCommand("deal".to_string()))
        );
        assert!(ParseError::InvalidRound("9".to_string()).to_string().contains("1 to 2"));
    }

    #[test]
    fn test_event_ref() {
        assert_eq!(parse("advance vrijdag").unwrap().event_ref(), Some("vrijdag"));
        assert_eq!(parse("events").unwrap().event_ref(), None);
    }
}
