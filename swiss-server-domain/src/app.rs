use std::sync::Arc;

use crate::{
    r#match::ArcMatchRepository,
    player::{ArcPlayerRepository, ArcPlayerService, PlayerServiceImpl},
    tournament::{ArcTournamentRepository, ArcTournamentService, TournamentServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub player_service: ArcPlayerService,
    pub tournament_service: ArcTournamentService,

    pub player_repository: ArcPlayerRepository,
    pub tournament_repository: ArcTournamentRepository,
    pub match_repository: ArcMatchRepository,
}

pub fn construct_app(
    player_repository: ArcPlayerRepository,
    tournament_repository: ArcTournamentRepository,
    match_repository: ArcMatchRepository,
) -> AppState {
    let player_service: ArcPlayerService = Arc::new(Box::new(PlayerServiceImpl::new(
        player_repository.clone(),
        tournament_repository.clone(),
        match_repository.clone(),
    )));

    let tournament_service: ArcTournamentService = Arc::new(Box::new(TournamentServiceImpl::new(
        player_service.clone(),
        tournament_repository.clone(),
        match_repository.clone(),
    )));

    AppState {
        player_service,
        tournament_service,

        player_repository,
        tournament_repository,
        match_repository,
    }
}
