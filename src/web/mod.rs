//! HTTP front end: contact submissions, lead listing, health, and the
//! embedded landing page.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod static_files;
pub mod utils;

use clap::Parser;

use crate::notifier::Notifier;
use crate::storage::LeadStore;

use config::{Cli, Config};
use state::AppState;

/// Entry point: parse CLI, open the database, start serving.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_cli_and_env(cli);

    crate::logging::init();

    crate::tlog!("techline-leads starting");

    let store = LeadStore::open(&config.db_path)?;
    let location = store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());
    crate::tlog!("  database: {} ({} lead(s) on record)", location, store.count()?);

    let notifier = Notifier::new(config.notifier_config());
    if notifier.is_configured() {
        crate::tlog!("  notifications: {} -> {}", config.email_from, config.email_to);
    } else {
        crate::tlog!("  WARNING: RESEND_API_KEY not set, lead emails will be skipped");
    }

    let app = router::build_router(AppState::new(store, notifier));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    crate::tlog!("techline-leads listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
