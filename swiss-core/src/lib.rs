mod bye;
mod pairing;
mod round;
mod standings;
mod tiebreak;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub use bye::{ByeAllocation, allocate_bye};
pub use pairing::{Pairing, Seat, pair_adjacent};
pub use round::{RoundState, evaluate_round, round_cap};
pub use standings::compute_standings;
pub use tiebreak::{apply_tiebreak, compare_omw};

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type MatchId = i64;
pub type Round = u32;

pub const WIN_POINTS: i64 = 2;
pub const DRAW_POINTS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("tournament has no contestants")]
    NoContestants,

    #[error("round {round} is still in progress: match counts range from {min} to {max}")]
    MismatchedMatchCounts { round: Round, min: u32, max: u32 },

    #[error("all {player_count} contestants already received a bye")]
    ExhaustedByes { player_count: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A row of the append-only match ledger.
///
/// A bye is stored with no second player and the first player as winner. A
/// draw has no winner.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchRecord {
    pub tournament_id: TournamentId,
    pub round: Round,
    pub player_a: PlayerId,
    pub player_b: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub reported_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_a == player || self.player_b == Some(player)
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.player_a == player {
            self.player_b
        } else if self.player_b == Some(player) {
            Some(self.player_a)
        } else {
            None
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_b.is_none()
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn is_won_by(&self, player: PlayerId) -> bool {
        self.winner == Some(player)
    }
}

/// The outcome of a single pairing, before it becomes a ledger row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Decisive { winner: PlayerId, loser: PlayerId },
    Draw(PlayerId, PlayerId),
    Bye(PlayerId),
}

impl MatchResult {
    pub fn new(winner: PlayerId, loser: PlayerId, is_tie: bool) -> Self {
        if is_tie {
            MatchResult::Draw(winner, loser)
        } else {
            MatchResult::Decisive { winner, loser }
        }
    }

    pub fn players(&self) -> (PlayerId, Option<PlayerId>) {
        match *self {
            MatchResult::Decisive { winner, loser } => (winner, Some(loser)),
            MatchResult::Draw(a, b) => (a, Some(b)),
            MatchResult::Bye(player) => (player, None),
        }
    }

    /// Points credited to each participant. A played match always hands out
    /// exactly two points in total.
    pub fn point_awards(&self) -> Vec<(PlayerId, i64)> {
        match *self {
            MatchResult::Decisive { winner, loser } => vec![(winner, WIN_POINTS), (loser, 0)],
            MatchResult::Draw(a, b) => vec![(a, DRAW_POINTS), (b, DRAW_POINTS)],
            MatchResult::Bye(player) => vec![(player, WIN_POINTS)],
        }
    }

    pub fn into_record(self, tournament_id: TournamentId, round: Round) -> MatchRecord {
        let (player_a, player_b) = self.players();
        let winner = match self {
            MatchResult::Decisive { winner, .. } => Some(winner),
            MatchResult::Draw(..) => None,
            MatchResult::Bye(player) => Some(player),
        };
        MatchRecord {
            tournament_id,
            round,
            player_a,
            player_b,
            winner,
            reported_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contestant {
    pub player_id: PlayerId,
    pub name: String,
    pub points: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches_played: u32,
    pub points: i64,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn contestant(player_id: PlayerId, points: i64) -> Contestant {
        Contestant {
            player_id,
            name: format!("player{}", player_id),
            points,
        }
    }

    pub fn win(round: Round, winner: PlayerId, loser: PlayerId) -> MatchRecord {
        MatchResult::new(winner, loser, false).into_record(1, round)
    }

    pub fn draw(round: Round, a: PlayerId, b: PlayerId) -> MatchRecord {
        MatchResult::new(a, b, true).into_record(1, round)
    }

    pub fn bye(round: Round, player: PlayerId) -> MatchRecord {
        MatchResult::Bye(player).into_record(1, round)
    }

    pub fn standing(player_id: PlayerId, points: i64) -> Standing {
        Standing {
            player_id,
            name: format!("player{}", player_id),
            wins: 0,
            matches_played: 0,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_awards_sum_to_two() {
        let decisive = MatchResult::new(1, 2, false);
        let draw = MatchResult::new(1, 2, true);

        for result in [decisive, draw] {
            let total: i64 = result.point_awards().iter().map(|(_, p)| p).sum();
            assert_eq!(total, 2);
        }
        assert_eq!(draw.point_awards(), vec![(1, 1), (2, 1)]);
        assert_eq!(decisive.point_awards(), vec![(1, 2), (2, 0)]);
    }

    #[test]
    fn test_bye_record_is_single_sided_win() {
        let record = MatchResult::Bye(7).into_record(3, 2);
        assert!(record.is_bye());
        assert!(!record.is_draw());
        assert!(record.is_won_by(7));
        assert_eq!(record.opponent_of(7), None);
        assert_eq!(record.round, 2);
        assert_eq!(record.tournament_id, 3);
    }

    #[test]
    fn test_opponent_lookup() {
        let record = MatchResult::new(4, 9, true).into_record(1, 1);
        assert!(record.is_draw());
        assert_eq!(record.opponent_of(4), Some(9));
        assert_eq!(record.opponent_of(9), Some(4));
        assert_eq!(record.opponent_of(5), None);
        assert!(record.involves(9));
        assert!(!record.involves(5));
    }
}
