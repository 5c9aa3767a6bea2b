mod cli;
mod config;
mod error;
mod poller;
mod practicum;
mod state_machine;
mod telegram;
mod verdict;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use config::BotConfig;
use poller::{Iteration, PollLoop};
use practicum::PracticumClient;
use telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = BotConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    init_logging(cli.verbose, log_file.as_deref())?;

    if let Err(e) = config.validate() {
        error!("{e}");
        return Err(e.into());
    }

    match cli.resolved_command() {
        Command::Check => {
            info!("Configuration is valid: {config:?}");
        }
        Command::Run { from_date } => {
            let mut poll = build_loop(&config, from_date)?;
            poll.run().await;
        }
        Command::Once { from_date } => {
            let mut poll = build_loop(&config, from_date)?;
            match poll.tick().await {
                Iteration::NoChange => println!("No status changes"),
                Iteration::StatusChanged(text) => println!("{text}"),
                Iteration::Failed { message, notified } => {
                    println!("{message}");
                    if !notified {
                        println!("(repeat of the last failure, not re-sent)");
                    }
                }
            }
            println!("Next from_date: {}", poll.state().cursor());
        }
    }

    Ok(())
}

fn build_loop(
    config: &BotConfig,
    from_date: Option<i64>,
) -> Result<PollLoop<PracticumClient, TelegramNotifier>> {
    let source = PracticumClient::new(
        config.practicum_token.clone(),
        config.endpoint.clone(),
        config.request_timeout(),
    )
    .context("failed to build status API client")?;
    let notifier = TelegramNotifier::new(
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
        config.telegram_api_url.clone(),
        config.request_timeout(),
    )
    .context("failed to build Telegram client")?;

    let from_date = from_date.unwrap_or_else(|| chrono::Utc::now().timestamp());
    Ok(PollLoop::new(source, notifier, config, from_date))
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if verbose {
        "review_watch=trace"
    } else {
        "review_watch=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}
