//! Ball Bingo - Unified CLI
//!
//! Serves the game over HTTP, generates puzzles offline, and imports player
//! data.

#![warn(missing_docs)]

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ball_bingo::PuzzleGenerator;
use ball_bingo_server::{
    AppState, PlayerRecord, PlayerRepository, ServerConfig, SessionManager, router,
};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }

    let repository = PlayerRepository::new(config.db_path().clone(), config.facts().clone())?;
    repository.run_migrations()?;

    match cli.command {
        Command::Serve { host, port } => run_server(config, repository, host, port).await,
        Command::Generate { pretty } => run_generate(config, repository, pretty).await,
        Command::Import { file } => run_import(repository, file).await,
    }
}

/// Run the HTTP game server
#[instrument(skip(config, repository))]
async fn run_server(
    mut config: ServerConfig,
    repository: PlayerRepository,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let players = repository.count_players()?;
    if players < *config.generator().target() as i64 {
        warn!(
            players,
            target = config.generator().target(),
            "Too few players stored; starting a game will fail until more are imported"
        );
    }

    let state = AppState::new(
        SessionManager::with_max_sessions(*config.max_sessions()),
        repository,
        config.generator().clone(),
    );
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(%address, "Server ready at http://{}/", address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Generate one puzzle and print it to stdout
#[instrument(skip(config, repository))]
async fn run_generate(
    config: ServerConfig,
    repository: PlayerRepository,
    pretty: bool,
) -> Result<()> {
    let generator_config = config.generator().clone();
    let puzzle = tokio::task::spawn_blocking(move || {
        PuzzleGenerator::new(&repository, generator_config).generate()
    })
    .await??;

    let json = if pretty {
        serde_json::to_string_pretty(&puzzle)?
    } else {
        serde_json::to_string(&puzzle)?
    };
    println!("{}", json);
    Ok(())
}

/// Import player records from a JSON file
#[instrument(skip(repository))]
async fn run_import(repository: PlayerRepository, file: PathBuf) -> Result<()> {
    let records = read_records(&file)?;
    let ids = tokio::task::spawn_blocking(move || repository.import(&records)).await??;
    info!(count = ids.len(), file = %file.display(), "Import complete");
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<PlayerRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(records)
}
