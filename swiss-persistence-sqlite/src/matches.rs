use swiss_core::TournamentId;
use swiss_server_domain::{
    ServiceResult,
    r#match::{MatchId, MatchRecord, MatchRepository},
};

use crate::{DatabaseError, SqlitePool, get_connection};

pub struct SqliteMatchRepository {
    pool: SqlitePool,
}

impl SqliteMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn match_from_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
        Ok(MatchRecord {
            tournament_id: row.get("tournament_id")?,
            round: row.get("round")?,
            player_a: row.get("player_a")?,
            player_b: row.get("player_b")?,
            winner: row.get("winner")?,
            reported_at: row.get("reported_at")?,
        })
    }
}

impl MatchRepository for SqliteMatchRepository {
    fn record_match(&self, record: &MatchRecord) -> ServiceResult<MatchId> {
        let conn = get_connection(&self.pool)?;
        // Id is auto-incremented
        conn.execute(
            "INSERT INTO matches (tournament_id, round, player_a, player_b, winner, reported_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                record.tournament_id,
                record.round,
                record.player_a,
                record.player_b,
                record.winner,
                record.reported_at,
            ],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn list_matches(&self, tournament_id: TournamentId) -> ServiceResult<Vec<MatchRecord>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare(
                "SELECT tournament_id, round, player_a, player_b, winner, reported_at FROM matches WHERE tournament_id = ?1 ORDER BY id",
            )
            .map_err(DatabaseError::QueryError)?;
        let matches = stmt
            .query_map([tournament_id], Self::match_from_row)
            .map_err(DatabaseError::QueryError)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::QueryError)?;
        Ok(matches)
    }

    fn delete_matches(&self) -> ServiceResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute("DELETE FROM matches", [])
            .map_err(DatabaseError::QueryError)?;
        Ok(())
    }
}
