use std::sync::Arc;

use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use swiss_server_domain::{
    ServiceError, r#match::ArcMatchRepository, player::ArcPlayerRepository,
    tournament::ArcTournamentRepository,
};
use thiserror::Error;

use crate::{
    matches::SqliteMatchRepository, players::SqlitePlayerRepository,
    tournaments::SqliteTournamentRepository,
};

pub mod matches;
pub mod players;
pub mod tournaments;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(r2d2::Error),
    #[error("Query error: {0}")]
    QueryError(rusqlite::Error),
}

impl From<DatabaseError> for ServiceError {
    fn from(error: DatabaseError) -> Self {
        ServiceError::Internal(error.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

pub type SqlitePool = Pool<SqliteConnectionManager>;

const POOL_SIZE: u32 = 5;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tournaments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS contestants (
    tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    points INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tournament_id, player_id)
);
CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
    round INTEGER NOT NULL,
    player_a INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    player_b INTEGER REFERENCES players(id) ON DELETE CASCADE,
    winner INTEGER REFERENCES players(id) ON DELETE CASCADE,
    reported_at TEXT NOT NULL,
    CHECK (player_b IS NULL OR player_a <> player_b)
);
CREATE TABLE IF NOT EXISTS byes (
    tournament_id INTEGER NOT NULL,
    player_id INTEGER NOT NULL,
    PRIMARY KEY (tournament_id, player_id),
    FOREIGN KEY (tournament_id, player_id)
        REFERENCES contestants(tournament_id, player_id) ON DELETE CASCADE
);
";

fn manager_with_foreign_keys(manager: SqliteConnectionManager) -> SqliteConnectionManager {
    manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}

/// Opens a pool on the database file at `db_path`.
pub fn create_db_pool(db_path: &str) -> DatabaseResult<SqlitePool> {
    info!("Opening tournament DB at {}", db_path);
    let manager = manager_with_foreign_keys(SqliteConnectionManager::file(db_path));
    Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(DatabaseError::ConnectionError)
}

/// Every connection to `:memory:` opens a fresh database, so the pool is
/// limited to one connection.
pub fn create_memory_pool() -> DatabaseResult<SqlitePool> {
    let manager = manager_with_foreign_keys(SqliteConnectionManager::memory());
    Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(DatabaseError::ConnectionError)
}

pub fn get_connection(
    pool: &SqlitePool,
) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
    pool.get().map_err(DatabaseError::ConnectionError)
}

pub fn create_schema(pool: &SqlitePool) -> DatabaseResult<()> {
    let conn = get_connection(pool)?;
    conn.execute_batch(SCHEMA)
        .map_err(DatabaseError::QueryError)?;
    debug!("Schema is up to date");
    Ok(())
}

pub fn sqlite_repositories(
    pool: SqlitePool,
) -> (
    ArcPlayerRepository,
    ArcTournamentRepository,
    ArcMatchRepository,
) {
    let player_repository: ArcPlayerRepository =
        Arc::new(Box::new(SqlitePlayerRepository::new(pool.clone())));
    let tournament_repository: ArcTournamentRepository =
        Arc::new(Box::new(SqliteTournamentRepository::new(pool.clone())));
    let match_repository: ArcMatchRepository =
        Arc::new(Box::new(SqliteMatchRepository::new(pool)));
    (player_repository, tournament_repository, match_repository)
}

#[cfg(test)]
pub(crate) fn test_pool() -> SqlitePool {
    let pool = create_memory_pool().expect("Failed to create DB pool");
    create_schema(&pool).expect("Failed to create schema");
    pool
}
