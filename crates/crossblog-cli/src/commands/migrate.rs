//! Migrate command
//!
//! Usage: crossblog migrate [--db <PATH>]

use std::path::PathBuf;

use clap::Args;
use crossblog_store::db;
use crossblog_store::migrations::{applied_migrations, apply_migrations};

use crate::settings::Settings;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// SQLite database path (defaults to storage.sqlite_path)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Settings file (defaults to ./crossblog.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute migrate command
pub fn execute(args: MigrateArgs) -> anyhow::Result<()> {
    let path = match args.db {
        Some(path) => path,
        None => Settings::load(args.config.as_deref())?.storage.sqlite_path,
    };

    let mut conn = db::open(&path)?;
    let applied = apply_migrations(&mut conn)?;

    if applied.is_empty() {
        println!("{} is up to date", path.display());
    } else {
        for id in &applied {
            println!("applied {}", id);
        }
    }
    println!(
        "schema at {} ({} migrations)",
        path.display(),
        applied_migrations(&conn)?.len()
    );
    Ok(())
}
