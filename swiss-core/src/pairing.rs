use serde::Serialize;

use crate::{PlayerId, Standing};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub name: String,
}

impl From<&Standing> for Seat {
    fn from(standing: &Standing) -> Self {
        Seat {
            player_id: standing.player_id,
            name: standing.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub first: Seat,
    /// `None` when `first` sits out the round.
    pub second: Option<Seat>,
}

impl Pairing {
    pub fn is_bye(&self) -> bool {
        self.second.is_none()
    }
}

/// Pairs rank 1 with rank 2, rank 3 with rank 4 and so on. A trailing odd
/// row becomes a bye.
pub fn pair_adjacent(order: &[Standing]) -> Vec<Pairing> {
    order
        .chunks(2)
        .map(|chunk| Pairing {
            first: Seat::from(&chunk[0]),
            second: chunk.get(1).map(Seat::from),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::standing;

    #[test]
    fn test_adjacent_rows_are_paired() {
        let order = vec![standing(1, 2), standing(3, 2), standing(2, 0), standing(4, 0)];
        let pairings = pair_adjacent(&order);

        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0].first.player_id, 1);
        assert_eq!(pairings[0].second.as_ref().map(|s| s.player_id), Some(3));
        assert_eq!(pairings[1].first.player_id, 2);
        assert_eq!(pairings[1].second.as_ref().map(|s| s.player_id), Some(4));
        assert!(pairings.iter().all(|p| !p.is_bye()));
    }

    #[test]
    fn test_trailing_row_gets_bye() {
        let order = vec![standing(1, 0), standing(2, 0), standing(3, 0)];
        let pairings = pair_adjacent(&order);

        assert_eq!(pairings.len(), 2);
        assert!(pairings[1].is_bye());
        assert_eq!(pairings[1].first.name, "player3");
    }

    #[test]
    fn test_empty_order() {
        assert!(pair_adjacent(&[]).is_empty());
    }
}
