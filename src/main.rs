use std::process::ExitCode;

use log::{error, info};
use swiss_persistence_sqlite::{
    DatabaseError, create_db_pool, create_schema, sqlite_repositories,
};
use swiss_server_domain::{
    ServiceError,
    app::{AppState, construct_app},
    memory::in_memory_repositories,
};
use thiserror::Error;

use crate::config::Config;

mod config;
mod driver;
mod logs;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("cannot serialize standings: {0}")]
    Json(#[from] serde_json::Error),
}

fn build_app(config: &Config) -> Result<AppState, RunError> {
    let (player_repository, tournament_repository, match_repository) = match &config.db_path {
        Some(db_path) => {
            let pool = create_db_pool(db_path)?;
            create_schema(&pool)?;
            sqlite_repositories(pool)
        }
        None => {
            info!("SWISS_DB not set, keeping tournaments in memory");
            in_memory_repositories()
        }
    };
    Ok(construct_app(
        player_repository,
        tournament_repository,
        match_repository,
    ))
}

fn run(config: &Config, tournament_name: &str, player_names: &[String]) -> Result<(), RunError> {
    let app = build_app(config)?;
    let standings = driver::run_tournament(&app, tournament_name, player_names)?;
    let json = serde_json::to_string_pretty(&standings)?;
    info!("Final standings of {}:\n{}", tournament_name, json);
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    if let Err(e) = logs::init_logger(&config) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((tournament_name, player_names)) = args.split_first() else {
        error!("Usage: swiss-server <tournament name> <player name>...");
        return ExitCode::FAILURE;
    };

    match run(&config, tournament_name, player_names) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
