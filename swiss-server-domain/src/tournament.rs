use std::{collections::HashSet, sync::Arc};

use log::{debug, info, warn};
use swiss_core::{
    Contestant, EngineError, MatchResult, Pairing, PlayerId, Round, RoundState, Standing,
    allocate_bye, compute_standings, evaluate_round, pair_adjacent,
};

use crate::{
    ServiceError, ServiceResult, r#match::ArcMatchRepository, player::ArcPlayerService,
};

pub use swiss_core::TournamentId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tournament {
    pub name: String,
}

pub type ArcTournamentRepository = Arc<Box<dyn TournamentRepository + Send + Sync + 'static>>;

pub trait TournamentRepository {
    fn create_tournament(&self, name: &str) -> ServiceResult<TournamentId>;
    fn get_tournament(&self, id: TournamentId) -> ServiceResult<Option<Tournament>>;
    fn find_tournament_by_name(
        &self,
        name: &str,
    ) -> ServiceResult<Option<(TournamentId, Tournament)>>;
    fn add_contestant(&self, tournament_id: TournamentId, player_id: PlayerId)
    -> ServiceResult<()>;
    fn is_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<bool>;
    /// Contestants ordered by player id.
    fn list_contestants(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Contestant>>;
    /// Adds `delta` to the accumulated points in a single step.
    fn update_points(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        delta: i64,
    ) -> ServiceResult<()>;
    fn record_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<()>;
    fn has_bye(&self, tournament_id: TournamentId, player_id: PlayerId) -> ServiceResult<bool>;
    fn list_byes(&self, tournament_id: TournamentId) -> ServiceResult<HashSet<PlayerId>>;
    /// Zeroes every contestant's points and forgets all byes.
    fn reset_scores(&self) -> ServiceResult<()>;
    /// Drops every contestant row and bye.
    fn clear_contestants(&self) -> ServiceResult<()>;
}

pub type ArcTournamentService = Arc<Box<dyn TournamentService + Send + Sync + 'static>>;

pub trait TournamentService {
    fn register_tournament(&self, name: &str) -> ServiceResult<TournamentId>;
    fn find_tournament(&self, name: &str) -> ServiceResult<TournamentId>;
    fn register_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<()>;
    fn get_standings(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Standing>>;
    fn round_state(&self, tournament_id: TournamentId) -> ServiceResult<RoundState>;
    /// Pairs the next round. Returns an empty list once the round cap is
    /// reached. A bye, if any, is recorded and scored immediately.
    fn next_pairing(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Pairing>>;
    fn report_match(
        &self,
        tournament_id: TournamentId,
        winner: PlayerId,
        loser: PlayerId,
        is_tie: bool,
    ) -> ServiceResult<()>;
    /// Clears the match ledger of all tournaments and resets points and byes.
    fn delete_matches(&self) -> ServiceResult<()>;
}

pub struct TournamentServiceImpl {
    player_service: ArcPlayerService,
    tournament_repository: ArcTournamentRepository,
    match_repository: ArcMatchRepository,
}

impl TournamentServiceImpl {
    pub fn new(
        player_service: ArcPlayerService,
        tournament_repository: ArcTournamentRepository,
        match_repository: ArcMatchRepository,
    ) -> Self {
        Self {
            player_service,
            tournament_repository,
            match_repository,
        }
    }

    fn ensure_tournament(&self, tournament_id: TournamentId) -> ServiceResult<Tournament> {
        match self.tournament_repository.get_tournament(tournament_id)? {
            Some(tournament) => Ok(tournament),
            None => ServiceError::not_found(format!("No tournament with id {}", tournament_id)),
        }
    }

    /// Appends the ledger row and credits the points of one result. Each
    /// contestant's points change exactly once per result.
    fn apply_result(
        &self,
        tournament_id: TournamentId,
        round: Round,
        result: MatchResult,
    ) -> ServiceResult<()> {
        let record = result.into_record(tournament_id, round);
        let match_id = self.match_repository.record_match(&record)?;
        for (player_id, points) in result.point_awards() {
            if points != 0 {
                self.tournament_repository
                    .update_points(tournament_id, player_id, points)?;
            }
        }
        debug!(
            "Recorded match {} in round {} of tournament {}: {:?}",
            match_id, round, tournament_id, result
        );
        Ok(())
    }

    fn award_bye(
        &self,
        tournament_id: TournamentId,
        round: Round,
        player_id: PlayerId,
    ) -> ServiceResult<()> {
        if self.tournament_repository.has_bye(tournament_id, player_id)? {
            return ServiceError::invalid_state(format!(
                "Player {} already had a bye in tournament {}",
                player_id, tournament_id
            ));
        }
        self.tournament_repository
            .record_bye(tournament_id, player_id)?;
        self.apply_result(tournament_id, round, MatchResult::Bye(player_id))?;
        info!(
            "Player {} receives a bye in round {} of tournament {}",
            player_id, round, tournament_id
        );
        Ok(())
    }
}

impl TournamentService for TournamentServiceImpl {
    fn register_tournament(&self, name: &str) -> ServiceResult<TournamentId> {
        let name = name.trim();
        if name.is_empty() {
            return ServiceError::bad_request("Tournament name must not be empty");
        }
        let id = self.tournament_repository.create_tournament(name)?;
        info!("Registered tournament {} with id {}", name, id);
        Ok(id)
    }

    fn find_tournament(&self, name: &str) -> ServiceResult<TournamentId> {
        match self
            .tournament_repository
            .find_tournament_by_name(name.trim())?
        {
            Some((id, _)) => Ok(id),
            None => ServiceError::not_found(format!("No tournament named {}", name)),
        }
    }

    fn register_contestant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> ServiceResult<()> {
        let tournament = self.ensure_tournament(tournament_id)?;
        let player = self.player_service.fetch_player(player_id)?;
        if self
            .tournament_repository
            .is_contestant(tournament_id, player_id)?
        {
            return ServiceError::bad_request(format!(
                "{} is already registered for {}",
                player.name, tournament.name
            ));
        }
        self.tournament_repository
            .add_contestant(tournament_id, player_id)?;
        info!("Added {} to tournament {}", player.name, tournament.name);
        Ok(())
    }

    fn get_standings(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Standing>> {
        self.ensure_tournament(tournament_id)?;
        let contestants = self.tournament_repository.list_contestants(tournament_id)?;
        let matches = self.match_repository.list_matches(tournament_id)?;
        let standings = compute_standings(&contestants, &matches);
        debug!("Standings of tournament {}: {:?}", tournament_id, standings);
        Ok(standings)
    }

    fn round_state(&self, tournament_id: TournamentId) -> ServiceResult<RoundState> {
        let standings = self.get_standings(tournament_id)?;
        Ok(evaluate_round(&standings)?)
    }

    fn next_pairing(&self, tournament_id: TournamentId) -> ServiceResult<Vec<Pairing>> {
        let standings = self.get_standings(tournament_id)?;
        let next_round = match evaluate_round(&standings)? {
            RoundState::Complete { total_rounds } => {
                info!(
                    "Tournament {} is complete after {} rounds",
                    tournament_id, total_rounds
                );
                return Ok(Vec::new());
            }
            RoundState::AwaitingAllResults { round, min_played } => {
                return Err(EngineError::MismatchedMatchCounts {
                    round,
                    min: min_played,
                    max: round,
                }
                .into());
            }
            RoundState::ReadyForPairing { next_round, .. } => next_round,
        };

        let previous_byes = self.tournament_repository.list_byes(tournament_id)?;
        let allocation = allocate_bye(standings, &previous_byes).inspect_err(|e| {
            warn!("Cannot pair tournament {}: {}", tournament_id, e);
        })?;
        if let Some(player_id) = allocation.bye {
            self.award_bye(tournament_id, next_round, player_id)?;
        }

        let pairings = pair_adjacent(&allocation.order);
        info!(
            "Generated {} pairings for round {} of tournament {}",
            pairings.len(),
            next_round,
            tournament_id
        );
        Ok(pairings)
    }

    fn report_match(
        &self,
        tournament_id: TournamentId,
        winner: PlayerId,
        loser: PlayerId,
        is_tie: bool,
    ) -> ServiceResult<()> {
        if winner == loser {
            return ServiceError::bad_request("A match needs two distinct players");
        }
        self.ensure_tournament(tournament_id)?;
        for player_id in [winner, loser] {
            if !self
                .tournament_repository
                .is_contestant(tournament_id, player_id)?
            {
                return ServiceError::bad_request(format!(
                    "Player {} is not a contestant of tournament {}",
                    player_id, tournament_id
                ));
            }
        }

        let standings = self.get_standings(tournament_id)?;
        let state = evaluate_round(&standings)?;
        if let RoundState::Complete { total_rounds } = state {
            return ServiceError::invalid_state(format!(
                "Tournament {} is complete after {} rounds",
                tournament_id, total_rounds
            ));
        }
        let played = |player_id: PlayerId| {
            standings
                .iter()
                .find(|s| s.player_id == player_id)
                .map_or(0, |s| s.matches_played)
        };
        if let RoundState::AwaitingAllResults { round, .. } = state {
            if played(winner) >= round || played(loser) >= round {
                warn!(
                    "Match of {} and {} in tournament {} is reported ahead of round {}",
                    winner, loser, tournament_id, round
                );
            }
        }
        let round = played(winner).max(played(loser)) + 1;

        self.apply_result(tournament_id, round, MatchResult::new(winner, loser, is_tie))?;
        info!(
            "Reported {} {} {} in tournament {}",
            winner,
            if is_tie { "drew with" } else { "beat" },
            loser,
            tournament_id
        );
        Ok(())
    }

    fn delete_matches(&self) -> ServiceResult<()> {
        self.match_repository.delete_matches()?;
        self.tournament_repository.reset_scores()?;
        info!("Deleted all matches");
        Ok(())
    }
}
