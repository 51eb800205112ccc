//! tea-countdown: a full-screen countdown timer for the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tea_countdown::config::{self, Config};

#[derive(Parser)]
#[command(name = "tea-countdown")]
#[command(version, about = "Countdown timer with a progress ring and completion alerts")]
struct Cli {
    /// Initial minutes (0-99)
    #[arg(short, long)]
    minutes: Option<u32>,

    /// Initial seconds (0-59)
    #[arg(short, long)]
    seconds: Option<u32>,

    /// Start with sound alerts muted
    #[arg(long)]
    muted: bool,

    /// Never show desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Configuration file (default: the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tea_countdown=trace"
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(minutes) = self.minutes {
            config.minutes = minutes;
        }
        if let Some(seconds) = self.seconds {
            config.seconds = seconds;
        }
        if self.muted {
            config.muted = true;
        }
        if self.no_notify {
            config.notifications = false;
        }
        if let Some(file) = self.log_file {
            config.log.file = Some(file);
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        config.clamped()
    }
}

/// Logs go to a file only; the terminal is owned by the UI.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = &config.log.file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .with_context(|| format!("invalid log level {:?}", config.log.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = Config::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    let config = cli.apply(config);

    init_tracing(&config)?;
    tracing::debug!(config = ?config, "configuration loaded");

    tea_countdown::app::run(config).await?;
    Ok(())
}
