//! Command-line interface for ball_bingo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ball Bingo - fair puzzle generator and game server
#[derive(Parser, Debug)]
#[command(name = "ball_bingo")]
#[command(about = "Place each footballer on the one cell that fits them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate one puzzle and print it as JSON
    Generate {
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Load players from a JSON file into the database
    Import {
        /// JSON array of player records
        file: PathBuf,
    },
}
