use std::sync::Arc;

use log::info;

use crate::{
    ServiceError, ServiceResult, r#match::ArcMatchRepository,
    tournament::ArcTournamentRepository,
};

pub use swiss_core::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

pub trait PlayerRepository {
    fn create_player(&self, name: &str) -> ServiceResult<PlayerId>;
    fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>>;
    fn find_player_by_name(&self, name: &str) -> ServiceResult<Option<(PlayerId, Player)>>;
    fn count_players(&self) -> ServiceResult<usize>;
    fn delete_players(&self) -> ServiceResult<()>;
}

pub type ArcPlayerService = Arc<Box<dyn PlayerService + Send + Sync + 'static>>;

pub trait PlayerService {
    fn register_player(&self, name: &str) -> ServiceResult<PlayerId>;
    fn find_player(&self, name: &str) -> ServiceResult<PlayerId>;
    fn fetch_player(&self, id: PlayerId) -> ServiceResult<Player>;
    fn count_players(&self) -> ServiceResult<usize>;
    /// Removes every player together with their contestant rows, matches
    /// and byes.
    fn delete_players(&self) -> ServiceResult<()>;
}

pub struct PlayerServiceImpl {
    player_repository: ArcPlayerRepository,
    tournament_repository: ArcTournamentRepository,
    match_repository: ArcMatchRepository,
}

impl PlayerServiceImpl {
    pub fn new(
        player_repository: ArcPlayerRepository,
        tournament_repository: ArcTournamentRepository,
        match_repository: ArcMatchRepository,
    ) -> Self {
        Self {
            player_repository,
            tournament_repository,
            match_repository,
        }
    }
}

impl PlayerService for PlayerServiceImpl {
    fn register_player(&self, name: &str) -> ServiceResult<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return ServiceError::bad_request("Player name must not be empty");
        }
        let id = self.player_repository.create_player(name)?;
        info!("Registered player {} with id {}", name, id);
        Ok(id)
    }

    fn find_player(&self, name: &str) -> ServiceResult<PlayerId> {
        match self.player_repository.find_player_by_name(name.trim())? {
            Some((id, _)) => Ok(id),
            None => ServiceError::not_found(format!("No player named {}", name)),
        }
    }

    fn fetch_player(&self, id: PlayerId) -> ServiceResult<Player> {
        match self.player_repository.get_player(id)? {
            Some(player) => Ok(player),
            None => ServiceError::not_found(format!("No player with id {}", id)),
        }
    }

    fn count_players(&self) -> ServiceResult<usize> {
        self.player_repository.count_players()
    }

    fn delete_players(&self) -> ServiceResult<()> {
        self.match_repository.delete_matches()?;
        self.tournament_repository.clear_contestants()?;
        self.player_repository.delete_players()?;
        info!("Deleted all players");
        Ok(())
    }
}
