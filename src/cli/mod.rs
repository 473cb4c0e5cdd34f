//! CLI module
//!
//! Subcommands:
//! - `serve`: run the API server (default workflow)
//! - `migrate`: apply database migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Expense Tracker API - personal finance tracking with an AI assistant
#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply database migrations and exit
    Migrate,
}
