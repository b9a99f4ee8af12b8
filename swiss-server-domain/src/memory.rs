use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use dashmap::{DashMap, DashSet};
use swiss_core::{Contestant, MatchId, MatchRecord, PlayerId, TournamentId};

use crate::{
    ServiceError, ServiceResult,
    r#match::{ArcMatchRepository, MatchRepository},
    player::{ArcPlayerRepository, Player, PlayerRepository},
    tournament::{ArcTournamentRepository, Tournament, TournamentRepository},
};

/// Repositories that keep everything in process memory, used when no
/// database is configured.
pub fn in_memory_repositories() -> (
    ArcPlayerRepository,
    ArcTournamentRepository,
    ArcMatchRepository,
) {
    let players = InMemoryPlayerRepository::default();
    let tournament_repository: ArcTournamentRepository =
        Arc::new(Box::new(InMemoryTournamentRepository::new(&players)));
    let match_repository: ArcMatchRepository =
        Arc::new(Box::new(InMemoryMatchRepository::default()));
    let player_repository: ArcPlayerRepository = Arc::new(Box::new(players));
    (player_repository, tournament_repository, match_repository)
}

fn next_id(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Clone, Default)]
pub struct InMemoryPlayerRepository {
    last_id: Arc<AtomicI64>,
    players: Arc<DashMap<PlayerId, Player>>,
}

impl PlayerRepository for InMemoryPlayerRepository {
    fn create_player(&self, name: &str) -> ServiceResult<PlayerId> {
        let id = next_id(&self.last_id);
        self.players.insert(
            id,
            Player {
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        Ok(self.players.get(&id).map(|p| p.value().clone()))
    }

    fn find_player_by_name(&self, name: &str) -> ServiceResult<Option<(PlayerId, Player)>> {
        Ok(self
            .players
            .iter()
            .filter(|entry| entry.value().name == name)
            .min_by_key(|entry| *entry.key())
            .map(|entry| (*entry.key(), entry.value().clone())))
    }

    fn count_players(&self) -> ServiceResult<usize> {
        Ok(self.players.len())
    }

    fn delete_players(&self) -> ServiceResult<()> {
        self.players.clear();
        Ok(())
    }
}

pub struct InMemoryTournamentRepository {
    players: Arc<DashMap<PlayerId, Player>>,
    last_id: AtomicI64,
    tournaments: DashMap<TournamentId, Tournament>,
    points: DashMap<(TournamentId, PlayerId), i64>,
    byes: DashSet<(TournamentId, PlayerId)>,
}

impl InMemoryTournamentRepository {
    pub fn new(players: &InMemoryPlayerRepository) -> Self {
        Self {
            players: players.players.clone(),
            last_id: AtomicI64::new(0),
            tournaments: DashMap::new(),
            points: DashMap::new(),
            byes: DashSet::new(),
        }
    }

    fn contestant_exists(&self, tournament_id: TournamentId, player_id: PlayerId) -> bool {
        self.points.contains_key(&(tournament_id, player_id))
    }
}

impl TournamentRepository for InMemoryTournamentRepository {
    fn create_tournament(&self, name: &str) -> ServiceResult<TournamentId> {
        let id = next_id(&self.last_id);
        self.tournaments.insert(
            id,
            Tournament {
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    fn get_tournament(&self, id: TournamentId) -> ServiceResult<Option<Tournament>> {
        Ok(self.tournaments.get(&id).map(|t| t.value().clone()))
    }

    fn find_tournament_by_name(
        &self,
        name: &str,
    ) -> ServiceResult<Option<(TournamentId, Tournament)>> {
        Ok(self
            .tournaments
            .iter()
            .filter(|entry| entry.value().name == name)
            .min_by_key(|entry| *entry.key())
            .map(|entry| (*entry.key(), entry.value().clone())))
    }

    fn add_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<()> {
        if !self.tournaments.contains_key(&tournament_id) {
            return ServiceError::not_found(format!("No tournament with id {}", tournament_id));
        }
        if !self.players.contains_key(&player_id) {
            return ServiceError::not_found(format!("No player with id {}", player_id));
        }
        self.points.entry((tournament_id, player_id)).or_insert(0);
        Ok(())
    }

    fn is_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<bool> {
        Ok(self.contestant_exists(tournament_id, player_id))
    }

    fn list_contestants(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Contestant>> {
        let mut contestants = Vec::new();
        for entry in self.points.iter() {
            let (t, player_id) = *entry.key();
            if t != tournament_id {
                continue;
            }
            let Some(player) = self.players.get(&player_id) else {
                return ServiceError::internal(format!(
                    "Contestant {} of tournament {} has no player row",
                    player_id, tournament_id
                ));
            };
            contestants.push(Contestant {
                player_id,
                name: player.name.clone(),
                points: *entry.value(),
            });
        }
        contestants.sort_by_key(|c| c.player_id);
        Ok(contestants)
    }

    fn update_points(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        delta: i64,
    ) -> ServiceResult<()> {
        match self.points.get_mut(&(tournament_id, player_id)) {
            Some(mut points) => {
                *points += delta;
                Ok(())
            }
            None => ServiceError::not_found(format!(
                "Player {} is not a contestant of tournament {}",
                player_id, tournament_id
            )),
        }
    }

    fn record_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<()> {
        if !self.contestant_exists(tournament_id, player_id) {
            return ServiceError::not_found(format!(
                "Player {} is not a contestant of tournament {}",
                player_id, tournament_id
            ));
        }
        if !self.byes.insert((tournament_id, player_id)) {
            return ServiceError::invalid_state(format!(
                "Player {} already had a bye in tournament {}",
                player_id, tournament_id
            ));
        }
        Ok(())
    }

    fn has_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<bool> {
        Ok(self.byes.contains(&(tournament_id, player_id)))
    }

    fn list_byes(&self, tournament_id: TournamentId) -> ServiceResult<HashSet<PlayerId>> {
        Ok(self
            .byes
            .iter()
            .filter(|key| key.0 == tournament_id)
            .map(|key| key.1)
            .collect())
    }

    fn reset_scores(&self) -> ServiceResult<()> {
        self.points.alter_all(|_, _| 0);
        self.byes.clear();
        Ok(())
    }

    fn clear_contestants(&self) -> ServiceResult<()> {
        self.points.clear();
        self.byes.clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMatchRepository {
    last_id: AtomicI64,
    matches: DashMap<MatchId, MatchRecord>,
}

impl MatchRepository for InMemoryMatchRepository {
    fn record_match(&self, record: &MatchRecord) -> ServiceResult<MatchId> {
        let id = next_id(&self.last_id);
        self.matches.insert(id, record.clone());
        Ok(id)
    }

    fn list_matches(&self, tournament_id: TournamentId) -> ServiceResult<Vec<MatchRecord>> {
        let mut matches: Vec<(MatchId, MatchRecord)> = self
            .matches
            .iter()
            .filter(|entry| entry.value().tournament_id == tournament_id)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        matches.sort_by_key(|(id, _)| *id);
        Ok(matches.into_iter().map(|(_, record)| record).collect())
    }

    fn delete_matches(&self) -> ServiceResult<()> {
        self.matches.clear();
        Ok(())
    }
}
