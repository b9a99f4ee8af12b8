use rusqlite::OptionalExtension;
use swiss_server_domain::{
    ServiceResult,
    player::{Player, PlayerId, PlayerRepository},
};

use crate::{DatabaseError, SqlitePool, get_connection};

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &rusqlite::Row) -> rusqlite::Result<(PlayerId, Player)> {
        Ok((
            row.get("id")?,
            Player {
                name: row.get("name")?,
            },
        ))
    }
}

impl PlayerRepository for SqlitePlayerRepository {
    fn create_player(&self, name: &str) -> ServiceResult<PlayerId> {
        let conn = get_connection(&self.pool)?;
        conn.execute("INSERT INTO players (name) VALUES (?1)", [name])
            .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        let conn = get_connection(&self.pool)?;
        let player = conn
            .query_row(
                "SELECT id, name FROM players WHERE id = ?1",
                [id],
                Self::player_from_row,
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(player.map(|(_, player)| player))
    }

    fn find_player_by_name(&self, name: &str) -> ServiceResult<Option<(PlayerId, Player)>> {
        let conn = get_connection(&self.pool)?;
        let player = conn
            .query_row(
                "SELECT id, name FROM players WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                Self::player_from_row,
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(player)
    }

    fn count_players(&self) -> ServiceResult<usize> {
        let conn = get_connection(&self.pool)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .map_err(DatabaseError::QueryError)?;
        Ok(count as usize)
    }

    fn delete_players(&self) -> ServiceResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute("DELETE FROM players", [])
            .map_err(DatabaseError::QueryError)?;
        Ok(())
    }
}
