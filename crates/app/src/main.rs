//! Skillzone - terminal client for the Skillzone skill-sharing service
//!
//! Signs in, browses and searches the skill feed, manages the signed-in
//! user's skills, profile and experiences, and drives the admin panel.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use skillzone_core::{ClientConfig, FileSessionStore, SessionManager, SessionStore};
use skillzone_net::HttpClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod collection;
mod confirm;
mod events;
mod mutation;
mod poller;
mod state;
#[cfg(test)]
mod testing;
mod viewmodel;

use cli::{Cli, Frontend};
use confirm::{AssumeYes, Confirm, StdinConfirm};
use events::EventBus;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let store: Box<dyn SessionStore> = match &config.session.data_dir {
        Some(dir) => Box::new(FileSessionStore::new(dir)),
        None => Box::new(
            FileSessionStore::default_location().context("Failed to locate data directory")?,
        ),
    };
    let session = Arc::new(SessionManager::new(store));

    let client = HttpClient::new(&config.api.base_url).context("Invalid API URL")?;
    let (events, rx) = EventBus::channel();
    let state = Arc::new(AppState::new(Arc::new(client), session, events, config));

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    Frontend::new(state, confirm).run(cli.command, rx).await
}
