//! yehazz-bot entry point.
//!
//! Runs the connection supervisor and the control bridge side by side until
//! either stops or Ctrl+C is pressed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use yehazz_bot::config::{Args, Settings};
use yehazz_bot::media::{HttpFetcher, YtDlp};
use yehazz_bot::types::UserInfo;
use yehazz_bot::{bridge, Bot, ConsoleConnector, Hub, Jid, Supervisor};

/// Account the console session claims to be logged in as.
const CONSOLE_OWN_NUMBER: &str = "19990000000";
/// Sender of console lines in group chats.
const CONSOLE_SENDER: &str = "10000000000";

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks see it
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(&args.log_level);
    if let Err(e) = dotenv {
        debug!("no .env loaded: {}", e);
    }

    let settings = Settings::from_args(args).context("invalid configuration")?;
    info!(
        name = %settings.profile.name,
        session = %settings.session.path().display(),
        "starting"
    );

    let hub = Arc::new(Hub::new(settings.profile.name.clone()));
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let bot = Arc::new(Bot::new(
        settings.profile.clone(),
        Arc::new(fetcher),
        Arc::new(YtDlp::default()),
    ));

    let connector = Arc::new(ConsoleConnector::new(
        settings.console_chat.clone(),
        Jid::user(CONSOLE_SENDER),
        UserInfo {
            id: Jid::user(CONSOLE_OWN_NUMBER),
            name: Some(settings.profile.name.clone()),
        },
    ));
    let supervisor = Supervisor::new(connector, settings.session.clone(), bot, Arc::clone(&hub))
        .welcome_target(settings.welcome_target.clone())
        .reconnect_delay(settings.reconnect_delay);

    let listener = TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("failed to bind port {}", settings.port))?;

    tokio::select! {
        res = bridge::serve(listener, hub) => res.context("bridge stopped")?,
        res = supervisor.run() => res.context("supervisor stopped")?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
