//! Crossblog CLI
//!
//! Runs the article API server and manages the SQLite schema.

use clap::{Parser, Subcommand};

mod commands;
mod settings;

#[derive(Debug, Parser)]
#[command(name = "crossblog")]
#[command(about = "Crossblog - blog article API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply SQLite migrations
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Migrate(args) => commands::migrate::execute(args),
    }
}
