//! Executes parsed commands against the event service.

use chrono::Local;
use kaartmiddag::seating::{SeatRandomizer, SeatingConfig, plan_round};
use kaartmiddag::storage::EventStore;
use kaartmiddag::transfer::export_file_name;
use kaartmiddag::{
    EventError, EventId, EventService, Intent, ParticipantId, RoundPhase, ServiceError,
    normalize_name,
};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

use crate::commands::Command;
use crate::logging::{log_intent, log_storage_operation};
use crate::render::{
    render_event, render_events, render_names, render_results, render_round, short_id,
};

/// Errors raised while executing a command
#[derive(Debug, Error)]
pub enum RunError {
    #[error("No event matches '{0}'. Run 'km events' to list them")]
    UnknownEvent(String),

    #[error("No participant named '{name}' in {event}")]
    UnknownParticipant { event: String, name: String },

    #[error("Round {0} already has tables. Clear them first with 'km reset'")]
    AlreadySeated(u8),

    #[error("{0}")]
    InvalidSeating(String),

    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl RunError {
    /// Operator-facing message without internal identifiers
    pub fn client_message(&self) -> String {
        match self {
            RunError::Event(err) => err.client_message(),
            RunError::Service(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Owns the service for one invocation and turns commands into intents
pub struct Runner<S: EventStore + ?Sized, R: Rng = ThreadRng> {
    service: EventService<S>,
    seating: SeatingConfig,
    randomizer: SeatRandomizer<R>,
}

impl<S: EventStore + ?Sized> Runner<S, ThreadRng> {
    pub fn new(service: EventService<S>, seating: SeatingConfig) -> Self {
        Self::with_randomizer(service, seating, SeatRandomizer::new())
    }
}

impl<S: EventStore + ?Sized, R: Rng> Runner<S, R> {
    /// Create a runner with a specific randomizer (seeded in tests)
    pub fn with_randomizer(
        service: EventService<S>,
        seating: SeatingConfig,
        randomizer: SeatRandomizer<R>,
    ) -> Self {
        Self {
            service,
            seating,
            randomizer,
        }
    }

    pub fn service(&self) -> &EventService<S> {
        &self.service
    }

    /// Execute a command and return its output
    pub async fn run(&mut self, command: Command) -> Result<String, RunError> {
        let name = command.name();
        let event = command.event_ref().map(str::to_string);
        let result = self.execute(command).await;
        log_intent(name, event.as_deref(), result.is_ok());
        result
    }

    fn resolve(&self, reference: &str) -> Result<EventId, RunError> {
        self.service
            .state()
            .find_event(reference)
            .map(|e| e.id)
            .ok_or_else(|| RunError::UnknownEvent(reference.to_string()))
    }

    fn participant(&self, event_id: EventId, name: &str) -> Result<ParticipantId, RunError> {
        let event = self.service.event(event_id)?;
        event
            .participant_by_name(name)
            .map(|p| p.id)
            .ok_or_else(|| RunError::UnknownParticipant {
                event: event.title.clone(),
                name: name.to_string(),
            })
    }

    async fn execute(&mut self, command: Command) -> Result<String, RunError> {
        match command {
            Command::Events => Ok(render_events(self.service.events())),
            Command::Create { title } => {
                let outcome = self.service.dispatch(Intent::CreateEvent { title }).await?;
                let event = self.service.event(outcome.change.event_id())?;
                Ok(format!(
                    "Created {} [{}]\n",
                    event.title,
                    short_id(&event.id)
                ))
            }
            Command::Delete { event } => {
                let event_id = self.resolve(&event)?;
                let title = self.service.event(event_id)?.title.clone();
                self.service
                    .dispatch(Intent::DeleteEvent { event_id })
                    .await?;
                Ok(format!("Deleted {title}\n"))
            }
            Command::Show { event } => {
                let event_id = self.resolve(&event)?;
                Ok(render_event(self.service.event(event_id)?))
            }
            Command::Add { event, game, name } => {
                let event_id = self.resolve(&event)?;
                self.service
                    .dispatch(Intent::AddParticipant {
                        event_id,
                        name: name.clone(),
                        game,
                    })
                    .await?;
                Ok(format!("Added {} to {game}\n", normalize_name(&name)))
            }
            Command::Remove { event, name } => {
                let event_id = self.resolve(&event)?;
                let participant_id = self.participant(event_id, &name)?;
                self.service
                    .dispatch(Intent::RemoveParticipant {
                        event_id,
                        participant_id,
                    })
                    .await?;
                Ok(format!("Removed {}\n", normalize_name(&name)))
            }
            Command::Switch { event, name } => {
                let event_id = self.resolve(&event)?;
                let participant_id = self.participant(event_id, &name)?;
                let game = self
                    .service
                    .event(event_id)?
                    .participant(&participant_id)?
                    .game
                    .other();
                self.service
                    .dispatch(Intent::ChangeGame {
                        event_id,
                        participant_id,
                        game,
                    })
                    .await?;
                Ok(format!("{} now plays {game}\n", normalize_name(&name)))
            }
            Command::Seat {
                event,
                round,
                capacity,
                shuffle,
            } => {
                let event_id = self.resolve(&event)?;
                let current = self.service.event(event_id)?;
                if current.round_phase(round)? == RoundPhase::Seated {
                    return Err(RunError::AlreadySeated(round));
                }

                let mut config = match capacity {
                    Some(capacity) => self.seating.clone().with_capacity(capacity),
                    None => self.seating.clone(),
                };
                config.shuffle = config.shuffle && shuffle;
                config.validate().map_err(RunError::InvalidSeating)?;

                let tables = plan_round(current, &config, &mut self.randomizer);
                self.service
                    .dispatch(Intent::SetRoundTables {
                        event_id,
                        round,
                        tables,
                    })
                    .await?;
                let event = self.service.event(event_id)?;
                Ok(render_round(event, event.round(round)?))
            }
            Command::Move {
                event,
                round,
                name,
                table,
            } => {
                let event_id = self.resolve(&event)?;
                let participant_id = self.participant(event_id, &name)?;
                self.service
                    .dispatch(Intent::MoveParticipant {
                        event_id,
                        round,
                        participant_id,
                        table_number: table,
                    })
                    .await?;
                let event = self.service.event(event_id)?;
                Ok(render_round(event, event.round(round)?))
            }
            Command::Score {
                event,
                round,
                name,
                score,
            } => {
                let event_id = self.resolve(&event)?;
                let participant_id = self.participant(event_id, &name)?;
                self.service
                    .dispatch(Intent::SetScore {
                        event_id,
                        round,
                        participant_id,
                        score,
                    })
                    .await?;
                Ok(format!(
                    "{}: {score} in round {round}\n",
                    normalize_name(&name)
                ))
            }
            Command::Reset { event, round } => {
                let event_id = self.resolve(&event)?;
                self.service
                    .dispatch(Intent::ResetTables { event_id, round })
                    .await?;
                Ok(format!("Tables of round {round} cleared, scores kept\n"))
            }
            Command::Advance { event } => {
                let event_id = self.resolve(&event)?;
                self.service.dispatch(Intent::Advance { event_id }).await?;
                let event = self.service.event(event_id)?;
                let mut out = format!("{} is now in {}\n", event.title, event.status);
                if event.status.is_finished() {
                    out.push_str(&render_results(&event.results(), true));
                }
                Ok(out)
            }
            Command::Results { event } => {
                let event_id = self.resolve(&event)?;
                let event = self.service.event(event_id)?;
                Ok(render_results(&event.results(), event.status.is_finished()))
            }
            Command::Names { game, prefix } => {
                let builtin = self.service.builtin_names().for_game(game);
                let wanted = prefix.map(|p| p.trim().to_lowercase());
                let names: Vec<String> = self
                    .service
                    .state()
                    .custom_names
                    .suggestions(game, builtin)
                    .into_iter()
                    .filter(|name| match &wanted {
                        Some(prefix) => name
                            .to_lowercase()
                            .split_whitespace()
                            .any(|word| word.starts_with(prefix.as_str())),
                        None => true,
                    })
                    .collect();
                Ok(render_names(&names))
            }
            Command::Export { file } => {
                let path = file
                    .unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
                let started = Instant::now();
                let document = self.service.export()?;
                tokio::fs::write(&path, document)
                    .await
                    .map_err(|source| RunError::Io {
                        path: path.clone(),
                        source,
                    })?;
                log_storage_operation("export", "file", elapsed_ms(started));
                Ok(format!(
                    "Exported {} events to {}\n",
                    self.service.events().len(),
                    path.display()
                ))
            }
            Command::Import { file } => {
                let started = Instant::now();
                let raw = tokio::fs::read_to_string(&file)
                    .await
                    .map_err(|source| RunError::Io {
                        path: file.clone(),
                        source,
                    })?;
                let count = self.service.import(&raw).await?;
                log_storage_operation("import", "file", elapsed_ms(started));
                Ok(format!("Imported {count} events from {}\n", file.display()))
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
