//! Configuration types and constants for the lead-capture server.

use std::path::PathBuf;

use clap::Parser;

use crate::notifier::{NotifierConfig, DEFAULT_PROVIDER_URL};

pub(crate) const DEFAULT_LIST_LIMIT: i64 = 50;
/// Largest page `GET /api/leads` will return; larger requests are clamped.
pub(crate) const MAX_LIST_LIMIT: i64 = 1000;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_DB_PATH: &str = "leads.db";
const DEFAULT_EMAIL_FROM: &str = "onboarding@resend.dev";
const DEFAULT_EMAIL_TO: &str = "africatechline@gmail.com";

/// Lead-capture backend: stores contact-form submissions in SQLite and
/// emails each one to an operator.
///
/// Configuration can be set via CLI arguments or environment variables.
/// CLI arguments take precedence over environment variables.
#[derive(Parser, Debug, Default)]
#[command(name = "techline-leads", version, about)]
pub struct Cli {
    /// HTTP server bind address [env: LEADS_BIND] [default: 0.0.0.0:8000]
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// SQLite database file [env: DB_PATH] [default: leads.db]
    #[arg(long, short = 'd')]
    pub db_path: Option<PathBuf>,

    /// Email provider API key; delivery is skipped when unset [env: RESEND_API_KEY]
    #[arg(long)]
    pub resend_api_key: Option<String>,

    /// Sender address for notifications [env: EMAIL_FROM]
    #[arg(long)]
    pub email_from: Option<String>,

    /// Operator address that receives notifications [env: EMAIL_TO]
    #[arg(long)]
    pub email_to: Option<String>,

    /// Email provider endpoint [env: RESEND_API_URL]
    #[arg(long)]
    pub resend_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub email_to: String,
    pub resend_url: String,
}

impl Config {
    pub fn from_cli_and_env(cli: Cli) -> Self {
        Self::from_cli_and_lookup(cli, |key| std::env::var(key).ok())
    }

    /// Resolve each setting from the CLI, then `lookup`, then the default.
    /// Empty values from `lookup` are treated as unset.
    pub fn from_cli_and_lookup(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = cli
            .bind
            .or_else(|| env("LEADS_BIND"))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let db_path = cli
            .db_path
            .or_else(|| env("DB_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let resend_api_key = cli
            .resend_api_key
            .filter(|k| !k.is_empty())
            .or_else(|| env("RESEND_API_KEY"));

        let email_from = cli
            .email_from
            .or_else(|| env("EMAIL_FROM"))
            .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string());

        let email_to = cli
            .email_to
            .or_else(|| env("EMAIL_TO"))
            .unwrap_or_else(|| DEFAULT_EMAIL_TO.to_string());

        let resend_url = cli
            .resend_url
            .or_else(|| env("RESEND_API_URL"))
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());

        Self {
            bind_addr,
            db_path,
            resend_api_key,
            email_from,
            email_to,
            resend_url,
        }
    }

    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            api_key: self.resend_api_key.clone(),
            from: self.email_from.clone(),
            to: self.email_to.clone(),
            endpoint: self.resend_url.clone(),
        }
    }
}
