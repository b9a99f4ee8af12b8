use serde::Serialize;

use crate::{EngineError, EngineResult, Round, Standing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RoundState {
    /// Some contestants have fewer matches than `round`.
    AwaitingAllResults { round: Round, min_played: u32 },
    ReadyForPairing { next_round: Round, total_rounds: Round },
    Complete { total_rounds: Round },
}

impl RoundState {
    pub fn is_complete(&self) -> bool {
        matches!(self, RoundState::Complete { .. })
    }
}

/// Swiss round cap, `ceil(log2(n))`.
pub fn round_cap(player_count: usize) -> Round {
    if player_count <= 1 {
        return 0;
    }
    usize::BITS - (player_count - 1).leading_zeros()
}

/// Derives the round state from the matches played column of the standings.
/// The cap is recomputed from the current field size on every call.
pub fn evaluate_round(standings: &[Standing]) -> EngineResult<RoundState> {
    let total_rounds = round_cap(standings.len());
    let played = standings.iter().map(|s| s.matches_played);
    let (Some(min), Some(max)) = (played.clone().min(), played.max()) else {
        return Err(EngineError::NoContestants);
    };

    if min >= total_rounds {
        Ok(RoundState::Complete { total_rounds })
    } else if min != max {
        Ok(RoundState::AwaitingAllResults {
            round: max,
            min_played: min,
        })
    } else {
        Ok(RoundState::ReadyForPairing {
            next_round: max + 1,
            total_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::standing;

    fn with_played(counts: &[u32]) -> Vec<Standing> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &played)| Standing {
                matches_played: played,
                ..standing(i as i64 + 1, 0)
            })
            .collect()
    }

    #[test]
    fn test_round_cap() {
        let expected = [
            (0, 0),
            (1, 0),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 3),
            (8, 3),
            (9, 4),
            (16, 4),
            (17, 5),
        ];
        for (players, rounds) in expected {
            assert_eq!(round_cap(players), rounds, "players = {}", players);
        }
    }

    #[test]
    fn test_empty_field_is_rejected() {
        assert_eq!(evaluate_round(&[]), Err(EngineError::NoContestants));
    }

    #[test]
    fn test_round_states() {
        assert_eq!(
            evaluate_round(&with_played(&[0, 0, 0, 0])),
            Ok(RoundState::ReadyForPairing {
                next_round: 1,
                total_rounds: 2
            })
        );
        assert_eq!(
            evaluate_round(&with_played(&[1, 0, 1, 0])),
            Ok(RoundState::AwaitingAllResults {
                round: 1,
                min_played: 0
            })
        );
        assert_eq!(
            evaluate_round(&with_played(&[2, 2, 2, 2])),
            Ok(RoundState::Complete { total_rounds: 2 })
        );
        assert!(evaluate_round(&with_played(&[3, 3, 3, 3, 3])).unwrap().is_complete());
    }

    #[test]
    fn test_single_contestant_is_complete() {
        assert_eq!(
            evaluate_round(&with_played(&[0])),
            Ok(RoundState::Complete { total_rounds: 0 })
        );
    }
}
