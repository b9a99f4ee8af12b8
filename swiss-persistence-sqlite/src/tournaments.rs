use std::collections::HashSet;

use rusqlite::OptionalExtension;
use swiss_core::{Contestant, PlayerId};
use swiss_server_domain::{
    ServiceError, ServiceResult,
    tournament::{Tournament, TournamentId, TournamentRepository},
};

use crate::{DatabaseError, SqlitePool, get_connection};

pub struct SqliteTournamentRepository {
    pool: SqlitePool,
}

impl SqliteTournamentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn tournament_from_row(row: &rusqlite::Row) -> rusqlite::Result<(TournamentId, Tournament)> {
        Ok((
            row.get("id")?,
            Tournament {
                name: row.get("name")?,
            },
        ))
    }

    fn contestant_from_row(row: &rusqlite::Row) -> rusqlite::Result<Contestant> {
        Ok(Contestant {
            player_id: row.get("player_id")?,
            name: row.get("name")?,
            points: row.get("points")?,
        })
    }

    fn exists(&self, query: &str, id: i64) -> ServiceResult<bool> {
        let conn = get_connection(&self.pool)?;
        let found = conn
            .query_row(query, [id], |_| Ok(()))
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(found.is_some())
    }
}

impl TournamentRepository for SqliteTournamentRepository {
    fn create_tournament(&self, name: &str) -> ServiceResult<TournamentId> {
        let conn = get_connection(&self.pool)?;
        conn.execute("INSERT INTO tournaments (name) VALUES (?1)", [name])
            .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_tournament(&self, id: TournamentId) -> ServiceResult<Option<Tournament>> {
        let conn = get_connection(&self.pool)?;
        let tournament = conn
            .query_row(
                "SELECT id, name FROM tournaments WHERE id = ?1",
                [id],
                Self::tournament_from_row,
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(tournament.map(|(_, tournament)| tournament))
    }

    fn find_tournament_by_name(
        &self,
        name: &str,
    ) -> ServiceResult<Option<(TournamentId, Tournament)>> {
        let conn = get_connection(&self.pool)?;
        let tournament = conn
            .query_row(
                "SELECT id, name FROM tournaments WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                Self::tournament_from_row,
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(tournament)
    }

    fn add_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<()> {
        if !self.exists("SELECT 1 FROM tournaments WHERE id = ?1", tournament_id)? {
            return ServiceError::not_found(format!("No tournament with id {}", tournament_id));
        }
        if !self.exists("SELECT 1 FROM players WHERE id = ?1", player_id)? {
            return ServiceError::not_found(format!("No player with id {}", player_id));
        }
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT OR IGNORE INTO contestants (tournament_id, player_id) VALUES (?1, ?2)",
            [tournament_id, player_id],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(())
    }

    fn is_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<bool> {
        let conn = get_connection(&self.pool)?;
        let found = conn
            .query_row(
                "SELECT 1 FROM contestants WHERE tournament_id = ?1 AND player_id = ?2",
                [tournament_id, player_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(found.is_some())
    }

    fn list_contestants(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Contestant>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare(
                "SELECT c.player_id AS player_id, p.name AS name, c.points AS points FROM contestants c JOIN players p ON p.id = c.player_id WHERE c.tournament_id = ?1 ORDER BY c.player_id",
            )
            .map_err(DatabaseError::QueryError)?;
        let contestants = stmt
            .query_map([tournament_id], Self::contestant_from_row)
            .map_err(DatabaseError::QueryError)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::QueryError)?;
        Ok(contestants)
    }

    fn update_points(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        delta: i64,
    ) -> ServiceResult<()> {
        let conn = get_connection(&self.pool)?;
        let updated = conn
            .execute(
                "UPDATE contestants SET points = points + ?1 WHERE tournament_id = ?2 AND player_id = ?3",
                [delta, tournament_id, player_id],
            )
            .map_err(DatabaseError::QueryError)?;
        if updated == 0 {
            return ServiceError::not_found(format!(
                "Player {} is not a contestant of tournament {}",
                player_id, tournament_id
            ));
        }
        Ok(())
    }

    fn record_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<()> {
        if !self.is_contestant(tournament_id, player_id)? {
            return ServiceError::not_found(format!(
                "Player {} is not a contestant of tournament {}",
                player_id, tournament_id
            ));
        }
        let conn = get_connection(&self.pool)?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO byes (tournament_id, player_id) VALUES (?1, ?2)",
                [tournament_id, player_id],
            )
            .map_err(DatabaseError::QueryError)?;
        if inserted == 0 {
            return ServiceError::invalid_state(format!(
                "Player {} already had a bye in tournament {}",
                player_id, tournament_id
            ));
        }
        Ok(())
    }

    fn has_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<bool> {
        let conn = get_connection(&self.pool)?;
        let found = conn
            .query_row(
                "SELECT 1 FROM byes WHERE tournament_id = ?1 AND player_id = ?2",
                [tournament_id, player_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(DatabaseError::QueryError)?;
        Ok(found.is_some())
    }

    fn list_byes(&self, tournament_id: TournamentId) -> ServiceResult<HashSet<PlayerId>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT player_id FROM byes WHERE tournament_id = ?1")
            .map_err(DatabaseError::QueryError)?;
        let byes = stmt
            .query_map([tournament_id], |row| row.get(0))
            .map_err(DatabaseError::QueryError)?
            .collect::<Result<HashSet<PlayerId>, _>>()
            .map_err(DatabaseError::QueryError)?;
        Ok(byes)
    }

    fn reset_scores(&self) -> ServiceResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute_batch("UPDATE contestants SET points = 0; DELETE FROM byes;")
            .map_err(DatabaseError::QueryError)?;
        Ok(())
    }

    fn clear_contestants(&self) -> ServiceResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute_batch("DELETE FROM byes; DELETE FROM contestants;")
            .map_err(DatabaseError::QueryError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use swiss_server_domain::player::PlayerRepository;

    use crate::{players::SqlitePlayerRepository, test_pool};

    use super::*;

    fn repos() -> (SqlitePlayerRepository, SqliteTournamentRepository) {
        let pool = test_pool();
        (
            SqlitePlayerRepository::new(pool.clone()),
            SqliteTournamentRepository::new(pool),
        )
    }

    #[test]
    fn test_points_accumulate_per_contestant() {
        let (players, tournaments) = repos();
        let t = tournaments.create_tournament("Tourney of the Hand").unwrap();
        let gregor = players.create_player("Gregor Clegane").unwrap();
        let loras = players.create_player("Loras Tyrell").unwrap();
        tournaments.add_contestant(t, loras).unwrap();
        tournaments.add_contestant(t, gregor).unwrap();
        tournaments.add_contestant(t, gregor).unwrap();

        tournaments.update_points(t, loras, 2).unwrap();
        tournaments.update_points(t, loras, 1).unwrap();

        let contestants = tournaments.list_contestants(t).unwrap();
        assert_eq!(
            contestants,
            vec![
                Contestant {
                    player_id: gregor,
                    name: "Gregor Clegane".to_string(),
                    points: 0
                },
                Contestant {
                    player_id: loras,
                    name: "Loras Tyrell".to_string(),
                    points: 3
                },
            ]
        );
        assert!(tournaments.is_contestant(t, loras).unwrap());
        assert!(matches!(
            tournaments.update_points(t, loras + 10, 2),
            Err(ServiceError::NotFound(..))
        ));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let (players, tournaments) = repos();
        let t = tournaments.create_tournament("Tourney at Lannisport").unwrap();
        let p = players.create_player("Barristan Selmy").unwrap();
        assert!(matches!(
            tournaments.add_contestant(t + 1, p),
            Err(ServiceError::NotFound(..))
        ));
        assert!(matches!(
            tournaments.add_contestant(t, p + 1),
            Err(ServiceError::NotFound(..))
        ));
        assert_eq!(tournaments.get_tournament(t + 1).unwrap(), None);
        assert_eq!(
            tournaments
                .find_tournament_by_name("Tourney at Lannisport")
                .unwrap()
                .map(|(id, _)| id),
            Some(t)
        );
    }

    #[test]
    fn test_byes_are_recorded_once() {
        let (players, tournaments) = repos();
        let t = tournaments.create_tournament("Tourney at Ashford").unwrap();
        let dunk = players.create_player("Duncan the Tall").unwrap();
        let egg = players.create_player("Aegon Targaryen").unwrap();
        tournaments.add_contestant(t, dunk).unwrap();

        tournaments.record_bye(t, dunk).unwrap();
        assert!(tournaments.has_bye(t, dunk).unwrap());
        assert!(matches!(
            tournaments.record_bye(t, dunk),
            Err(ServiceError::InvalidState(..))
        ));
        assert!(matches!(
            tournaments.record_bye(t, egg),
            Err(ServiceError::NotFound(..))
        ));
        assert_eq!(tournaments.list_byes(t).unwrap(), HashSet::from([dunk]));

        tournaments.update_points(t, dunk, 2).unwrap();
        tournaments.reset_scores().unwrap();
        assert!(tournaments.list_byes(t).unwrap().is_empty());
        assert_eq!(tournaments.list_contestants(t).unwrap()[0].points, 0);

        tournaments.clear_contestants().unwrap();
        assert!(tournaments.list_contestants(t).unwrap().is_empty());
    }
}
