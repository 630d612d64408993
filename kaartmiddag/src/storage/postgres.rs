//! PostgreSQL event store.
//!
//! Events are stored without their rounds in `events`; every reached round is
//! a row in `rounds` keyed by `(event_id, number)`. Learned names live in
//! `custom_names`. Each save rewrites one event and its rounds inside a single
//! transaction.

use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use std::collections::HashMap;
use std::time::Duration;

use super::EventStore;
use super::config::DatabaseConfig;
use super::errors::{StorageError, StorageResult};
use crate::event::{CardEvent, EventId, GameType, NameBook, Round};

const SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Event store backed by a Postgres pool
#[derive(Clone, Debug)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Connect a new pool
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kaartmiddag::storage::{DatabaseConfig, PgEventStore};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), kaartmiddag::storage::StorageError> {
    ///     let config = DatabaseConfig {
    ///         database_url: Some("postgres://postgres@localhost/kaartmiddag".to_string()),
    ///         ..DatabaseConfig::default()
    ///     };
    ///     let store = PgEventStore::connect(&config).await?;
    ///     store.ensure_schema().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StorageError::Config("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(url)
            .await?;

        info!(
            "Connected to postgres (max {} connections)",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Create the tables if they do not exist yet
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| has_sql(s)) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Schema ready");
        Ok(())
    }

    pub async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Anything besides blank lines and `--` comments
fn has_sql(statement: &str) -> bool {
    statement
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with("--"))
}

async fn write_event(conn: &mut PgConnection, event: &CardEvent) -> StorageResult<()> {
    let mut body = event.clone();
    body.rounds.clear();

    sqlx::query(
        "INSERT INTO events (id, title, status, data) VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE
         SET title = EXCLUDED.title, status = EXCLUDED.status, data = EXCLUDED.data, updated_at = NOW()",
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(event.status.to_string())
    .bind(Json(&body))
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM rounds WHERE event_id = $1")
        .bind(event.id)
        .execute(&mut *conn)
        .await?;

    for round in &event.rounds {
        sqlx::query("INSERT INTO rounds (event_id, number, data) VALUES ($1, $2, $3)")
            .bind(event.id)
            .bind(i16::from(round.number))
            .bind(Json(round))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn write_names(conn: &mut PgConnection, names: &NameBook) -> StorageResult<()> {
    sqlx::query("DELETE FROM custom_names")
        .execute(&mut *conn)
        .await?;

    for game in GameType::ALL {
        for (position, name) in names.names(game).iter().enumerate() {
            sqlx::query("INSERT INTO custom_names (game, name, position) VALUES ($1, $2, $3)")
                .bind(game.to_string())
                .bind(name)
                .bind(i32::try_from(position).unwrap_or(i32::MAX))
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

/// Attach round rows to their event bodies, keeping the event order.
///
/// No validation happens here; the service decides what to do with events
/// that break an invariant.
fn assemble_events(
    bodies: Vec<(EventId, CardEvent)>,
    round_rows: Vec<(EventId, Round)>,
) -> Vec<CardEvent> {
    let mut rounds: HashMap<EventId, Vec<Round>> = HashMap::new();
    for (event_id, round) in round_rows {
        rounds.entry(event_id).or_default().push(round);
    }

    bodies
        .into_iter()
        .map(|(id, mut event)| {
            let mut reached = rounds.remove(&id).unwrap_or_default();
            reached.sort_by_key(|round| round.number);
            event.rounds = reached;
            event
        })
        .collect()
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn load_all(&self) -> StorageResult<Vec<CardEvent>> {
        let round_rows = sqlx::query("SELECT event_id, data FROM rounds ORDER BY event_id, number")
            .fetch_all(&self.pool)
            .await?;
        let mut rounds = Vec::with_capacity(round_rows.len());
        for row in round_rows {
            let event_id: EventId = row.try_get("event_id")?;
            let Json(round): Json<Round> = row.try_get("data")?;
            rounds.push((event_id, round));
        }

        let rows = sqlx::query("SELECT id, data FROM events ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        let mut bodies = Vec::with_capacity(rows.len());
        for row in rows {
            let id: EventId = row.try_get("id")?;
            let Json(event): Json<CardEvent> = row.try_get("data")?;
            bodies.push((id, event));
        }
        Ok(assemble_events(bodies, rounds))
    }

    async fn save(&self, event: &CardEvent) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;
        write_event(&mut tx, event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, event_id: EventId) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM rounds WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn load_names(&self) -> StorageResult<NameBook> {
        let rows = sqlx::query("SELECT game, name FROM custom_names ORDER BY game, position")
            .fetch_all(&self.pool)
            .await?;

        let mut names = NameBook::new();
        for row in rows {
            let game: String = row.try_get("game")?;
            let name: String = row.try_get("name")?;
            match game.parse::<GameType>() {
                Ok(GameType::Jokeren) => names.jokeren.push(name),
                Ok(GameType::Rikken) => names.rikken.push(name),
                Err(_) => debug!("Skipping learned name for unknown game {game}"),
            }
        }
        Ok(names)
    }

    async fn save_names(&self, names: &NameBook) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;
        write_names(&mut tx, names).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn save_with_names(&self, event: &CardEvent, names: &NameBook) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;
        write_event(&mut tx, event).await?;
        write_names(&mut tx, names).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_all(&self, events: &[CardEvent], names: &NameBook) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM rounds").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM events").execute(&mut *tx).await?;
        for event in events {
            write_event(&mut tx, event).await?;
        }
        write_names(&mut tx, names).await?;
        tx.commit().await?;
        info!("Replaced stored state with {} events", events.len());
        Ok(())
    }
}
