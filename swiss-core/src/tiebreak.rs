use std::{cmp::Ordering, collections::HashSet};

use crate::{MatchRecord, PlayerId, Standing};

fn opponents(player: PlayerId, matches: &[MatchRecord]) -> HashSet<PlayerId> {
    matches
        .iter()
        .filter_map(|record| record.opponent_of(player))
        .collect()
}

fn wins_against(player: PlayerId, group: &HashSet<PlayerId>, matches: &[MatchRecord]) -> usize {
    matches
        .iter()
        .filter(|record| record.is_won_by(player))
        .filter_map(|record| record.opponent_of(player))
        .filter(|opponent| group.contains(opponent))
        .count()
}

/// Compares two players by the matches they won against their common
/// opponents and each other.
///
/// `Ordering::Greater` means `a` ranks above `b`. Draws and byes never count
/// as wins here.
pub fn compare_omw(a: PlayerId, b: PlayerId, matches: &[MatchRecord]) -> Ordering {
    let opponents_a = opponents(a, matches);
    let opponents_b = opponents(b, matches);

    let mut group: HashSet<PlayerId> = opponents_a.intersection(&opponents_b).copied().collect();
    group.insert(a);
    group.insert(b);

    wins_against(a, &group, matches).cmp(&wins_against(b, &group, matches))
}

/// Single pass over adjacent rows tied on points, swapping a pair when the
/// lower row wins the comparison.
///
/// This is not a total order: with three or more tied players whose
/// relations are not transitive, the result depends on the base order.
pub fn apply_tiebreak(standings: &mut [Standing], matches: &[MatchRecord]) {
    for i in 1..standings.len() {
        let (upper, lower) = (&standings[i - 1], &standings[i]);
        if upper.points != lower.points {
            continue;
        }
        if compare_omw(lower.player_id, upper.player_id, matches) == Ordering::Greater {
            standings.swap(i - 1, i);
        }
    }
}
