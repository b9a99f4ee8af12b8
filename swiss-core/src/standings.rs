use std::collections::HashMap;

use crate::{Contestant, MatchRecord, PlayerId, Standing, tiebreak::apply_tiebreak};

/// Ranks every contestant by points, then by the opponent-match-wins pass.
///
/// Points are taken from the contestant rows; wins and matches played are
/// counted from the ledger. Contestants without any match still get a row.
pub fn compute_standings(contestants: &[Contestant], matches: &[MatchRecord]) -> Vec<Standing> {
    let mut tallies: HashMap<PlayerId, (u32, u32)> = contestants
        .iter()
        .map(|c| (c.player_id, (0, 0)))
        .collect();

    for record in matches {
        let participants = [Some(record.player_a), record.player_b];
        for player in participants.into_iter().flatten() {
            if let Some((wins, played)) = tallies.get_mut(&player) {
                *played += 1;
                if record.is_won_by(player) {
                    *wins += 1;
                }
            }
        }
    }

    let mut standings: Vec<Standing> = contestants
        .iter()
        .map(|c| {
            let (wins, matches_played) = tallies.get(&c.player_id).copied().unwrap_or((0, 0));
            Standing {
                player_id: c.player_id,
                name: c.name.clone(),
                wins,
                matches_played,
                points: c.points,
            }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    apply_tiebreak(&mut standings, matches);
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bye, contestant, draw, win};

    #[test]
    fn test_fresh_contestants_appear_with_zero_matches() {
        let contestants = vec![contestant(2, 0), contestant(1, 0)];
        let standings = compute_standings(&contestants, &[]);

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].player_id, 1);
        assert_eq!(standings[1].player_id, 2);
        assert!(standings.iter().all(|s| s.wins == 0 && s.matches_played == 0));
    }

    #[test]
    fn test_wins_and_matches_are_counted_from_ledger() {
        let contestants = vec![
            contestant(1, 2),
            contestant(2, 0),
            contestant(3, 2),
            contestant(4, 0),
        ];
        let matches = vec![win(1, 1, 2), win(1, 3, 4)];
        let standings = compute_standings(&contestants, &matches);

        for standing in &standings {
            assert_eq!(standing.matches_played, 1);
            let expected_wins = if [1, 3].contains(&standing.player_id) { 1 } else { 0 };
            assert_eq!(standing.wins, expected_wins);
        }
        let total_wins: u32 = standings.iter().map(|s| s.wins).sum();
        assert_eq!(total_wins, 2);
    }

    #[test]
    fn test_draw_ranks_between_win_and_loss() {
        let contestants = vec![
            contestant(1, 0),
            contestant(2, 1),
            contestant(3, 1),
            contestant(4, 2),
        ];
        let matches = vec![win(1, 4, 1), draw(1, 2, 3)];
        let standings = compute_standings(&contestants, &matches);

        let order: Vec<PlayerId> = standings.iter().map(|s| s.player_id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
        assert_eq!(standings[1].wins, 0);
        assert_eq!(standings[2].wins, 0);
        assert!(standings.iter().all(|s| s.matches_played == 1));
    }

    #[test]
    fn test_bye_counts_as_played_win() {
        let contestants = vec![contestant(1, 2), contestant(2, 2), contestant(3, 0)];
        let matches = vec![bye(1, 1), win(1, 2, 3)];
        let standings = compute_standings(&contestants, &matches);

        let first = standings.iter().find(|s| s.player_id == 1).unwrap();
        assert_eq!(first.wins, 1);
        assert_eq!(first.matches_played, 1);
        assert!(standings.iter().all(|s| s.matches_played == 1));
    }

    #[test]
    fn test_matches_of_unknown_players_are_ignored() {
        let contestants = vec![contestant(1, 0)];
        let matches = vec![win(1, 8, 9)];
        let standings = compute_standings(&contestants, &matches);

        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].matches_played, 0);
    }
}
