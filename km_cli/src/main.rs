//! Card afternoon administration from the command line.
//!
//! Every invocation loads the stored events, applies one command and
//! persists the result before exiting.

use std::ffi::OsString;
use std::time::Instant;

use anyhow::{Context, Error, anyhow};
use log::info;
use pico_args::Arguments;

use kaartmiddag::EventService;
use kaartmiddag::storage::open_store;
use km_cli::config::{CliConfig, Overrides};
use km_cli::{Runner, logging, parse_command};

const HELP: &str = "\
Run the Jokeren and Rikken card afternoon

USAGE:
  km [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  events                                  List all events
  create <title>                          Create an event
  delete <event>                          Delete an event
  show <event>                            Show participants, tables and scores
  add <event> <jokeren|rikken> <name>     Register a participant
  remove <event> <name>                   Remove a participant
  switch <event> <name>                   Move a participant to the other game
  seat <event> <round> [--capacity N] [--no-shuffle]
                                          Draw tables for a round
  move <event> <round> <name> <table>     Move a participant to a table
  score <event> <round> <name> <value>    Enter a score
  reset <event> <round>                   Clear a round's tables, keep scores
  advance <event>                         Move to the next phase
  results <event>                         Show standings and prizes
  names <jokeren|rikken> [prefix]         Suggest known names
  export [file]                           Write all data to a JSON file
  import <file>                           Replace all data from a JSON file

  <event> is a title (case-insensitive) or the start of an event id.

OPTIONS:
  --data       PATH        Data file for the file store  [default: env KM_DATA_FILE or kaartmiddag.json]
  --store      KIND        file, postgres or memory      [default: env KM_STORE or file]
  --db-url     URL         PostgreSQL connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  KM_TABLE_CAPACITY_JOKEREN  Players per Jokeren table (default 4)
  KM_TABLE_CAPACITY_RIKKEN   Players per Rikken table (default 4)
  KM_SHUFFLE_SEATS           Shuffle before drawing tables (default true)
  KM_NAMES_FILE              JSON file with built-in names per game
  RUST_LOG                   Log filter (logs go to stderr)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let overrides = Overrides {
        data_file: pargs.opt_value_from_str("--data")?,
        store: pargs.opt_value_from_str("--store")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };
    let args = free_args(pargs.finish())?;

    logging::init();

    let command = parse_command(&args)?;
    let config = CliConfig::from_env(overrides)?;
    let builtin = config.builtin_names()?;

    let started = Instant::now();
    let store = open_store(&config.storage)
        .await
        .map_err(|e| {
            anyhow!(
                "Failed to open {} store: {}",
                config.storage.kind,
                e.client_message()
            )
        })?;
    let service = EventService::open(store, builtin)
        .await
        .map_err(|e| anyhow!("Failed to load events: {}", e.client_message()))?;
    logging::log_storage_operation(
        "open",
        &config.storage.kind.to_string(),
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );
    info!("Loaded {} events", service.events().len());

    let mut runner = Runner::new(service, config.seating);
    let output = runner
        .run(command)
        .await
        .map_err(|e| anyhow!(e.client_message()))?;
    print!("{output}");
    Ok(())
}

fn free_args(raw: Vec<OsString>) -> Result<Vec<String>, Error> {
    raw.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| anyhow!("Argument is not valid UTF-8: {}", arg.to_string_lossy()))
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read arguments")
}
