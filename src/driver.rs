use log::info;
use swiss_core::{Pairing, Standing};
use swiss_server_domain::{ServiceError, ServiceResult, app::AppState};

fn describe(round: u32, pairing: &Pairing) -> String {
    match &pairing.second {
        Some(second) => format!(
            "Round {}: {} ({}) vs {} ({})",
            round, pairing.first.name, pairing.first.player_id, second.name, second.player_id
        ),
        None => format!(
            "Round {}: {} ({}) has a bye",
            round, pairing.first.name, pairing.first.player_id
        ),
    }
}

/// Registers a tournament with the given players and plays it to the round
/// cap, letting the first seat of every pairing win. Returns the final
/// standings.
pub fn run_tournament(
    app: &AppState,
    tournament_name: &str,
    player_names: &[String],
) -> ServiceResult<Vec<Standing>> {
    if player_names.is_empty() {
        return ServiceError::bad_request("A tournament needs at least one player");
    }

    let tournament_id = app.tournament_service.register_tournament(tournament_name)?;
    for name in player_names {
        let player_id = app.player_service.register_player(name)?;
        app.tournament_service
            .register_contestant(tournament_id, player_id)?;
    }

    let mut round = 0;
    loop {
        let pairings = app.tournament_service.next_pairing(tournament_id)?;
        if pairings.is_empty() {
            break;
        }
        round += 1;
        for pairing in &pairings {
            info!("{}", describe(round, pairing));
            if let Some(second) = &pairing.second {
                app.tournament_service.report_match(
                    tournament_id,
                    pairing.first.player_id,
                    second.player_id,
                    false,
                )?;
            }
        }
    }

    info!("{} finished after {} rounds", tournament_name, round);
    app.tournament_service.get_standings(tournament_id)
}

#[cfg(test)]
mod tests {
    use swiss_core::Seat;
    use swiss_server_domain::{app::construct_app, memory::in_memory_repositories};

    use super::*;

    fn app() -> AppState {
        let (players, tournaments, matches) = in_memory_repositories();
        construct_app(players, tournaments, matches)
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_even_field_has_single_undefeated_player() {
        let app = app();
        let standings = run_tournament(
            &app,
            "Tourney of the Hand",
            &names(&["Jaime", "Loras", "Gregor", "Sandor"]),
        )
        .unwrap();

        assert_eq!(standings.len(), 4);
        assert_eq!(standings[0].wins, 2);
        assert_eq!(standings[0].points, 4);
        assert!(standings.iter().all(|s| s.matches_played == 2));
        assert_eq!(standings.iter().map(|s| s.points).sum::<i64>(), 8);
    }

    #[test]
    fn test_odd_field_plays_to_cap() {
        let app = app();
        let standings =
            run_tournament(&app, "Kingsmoot", &names(&["Euron", "Victarion", "Asha"])).unwrap();
        assert!(standings.iter().all(|s| s.matches_played == 2));
        assert_eq!(app.player_service.count_players().unwrap(), 3);
    }

    #[test]
    fn test_no_players_is_rejected() {
        assert!(matches!(
            run_tournament(&app(), "Empty", &[]),
            Err(ServiceError::BadRequest(..))
        ));
    }

    #[test]
    fn test_describe_pairings() {
        let first = Seat {
            player_id: 1,
            name: "Brienne".to_string(),
        };
        let second = Seat {
            player_id: 2,
            name: "Jaime".to_string(),
        };
        let game = Pairing {
            first: first.clone(),
            second: Some(second),
        };
        let bye = Pairing {
            first,
            second: None,
        };
        assert_eq!(describe(1, &game), "Round 1: Brienne (1) vs Jaime (2)");
        assert_eq!(describe(3, &bye), "Round 3: Brienne (1) has a bye");
    }
}
