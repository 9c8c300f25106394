//! Serve command
//!
//! Usage: crossblog serve [--host <HOST>] [--port <PORT>] [--backend <memory|sqlite>]
//!                        [--db <PATH>] [--config <PATH>]

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use crossblog_core::logging_facility::{self, Profile};
use crossblog_store::{MemoryStore, SqliteStore};
use tokio::net::TcpListener;

use crate::settings::{Backend, Settings};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage backend (memory or sqlite)
    #[arg(long)]
    pub backend: Option<Backend>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Settings file (defaults to ./crossblog.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    /// Command-line flags win over file and environment settings
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(backend) = self.backend {
            settings.storage.backend = backend;
        }
        if let Some(db) = self.db {
            settings.storage.sqlite_path = db;
        }
        settings
    }
}

/// Execute serve command
pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let settings = args.apply(settings);

    let profile: Profile = settings
        .logging
        .profile
        .parse()
        .map_err(anyhow::Error::msg)?;
    logging_facility::init(profile);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(backend = %settings.storage.backend, "starting crossblog");

    let app = match settings.storage.backend {
        Backend::Memory => crossblog_api::router(MemoryStore::new()),
        Backend::Sqlite => {
            let path = &settings.storage.sqlite_path;
            let store = SqliteStore::connect(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            crossblog_api::router(store)
        }
    };

    crossblog_api::serve(listener, app).await?;
    Ok(())
}
