use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use postlimit::config::{AppConfig, LogFormat, LoggingConfig};
use postlimit::duration::parse_duration;
use postlimit::moderation::{ContentEvent, ContentGuard, LoggingActions, Outcome, StaticPrivileges};
use postlimit::store::MemoryStore;

#[derive(Parser, Debug)]
#[command(name = "postlimit", version, about = "Sliding window submission limits")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a duration string such as 1d7h30m
    Parse {
        /// Duration string
        spec: String,
        /// Unit to print the duration in (ms, s, m, h, d)
        #[arg(long, short, default_value = "s")]
        unit: String,
    },
    /// Load and validate a configuration file
    Validate {
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Run JSON-lines content events through the limits in a configuration
    Replay {
        #[arg(long, short)]
        config: PathBuf,
        /// File with one content event per line
        #[arg(long, short)]
        events: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { spec, unit } => {
            init_tracing(&LoggingConfig::default())?;
            let value = parse_duration(&spec, &unit)?;
            println!("{}{}", value, unit);
        }
        Command::Validate { config: path } => {
            let config = AppConfig::from_file(&path)?;
            init_tracing(&config.logging)?;
            info!(path = %path.display(), "Configuration loaded");

            let policies = config.validate()?;
            for policy in [&policies.post, &policies.comment] {
                println!(
                    "{}: limit={} window_ms={} reply={}",
                    policy.category,
                    policy.limit,
                    policy.window_ms,
                    policy.reply_text().is_some()
                );
            }
            info!(moderators = config.moderators.len(), "Configuration is valid");
        }
        Command::Replay { config: path, events } => {
            let config = AppConfig::from_file(&path)?;
            init_tracing(&config.logging)?;
            info!(path = %path.display(), "Configuration loaded");
            replay(&config, &events).await?;
        }
    }

    Ok(())
}

/// Feed every event in `events` through a guard backed by an in-memory store.
async fn replay(config: &AppConfig, events: &Path) -> anyhow::Result<()> {
    let policies = config.validate()?;
    let guard = ContentGuard::new(
        Arc::new(MemoryStore::new()),
        policies,
        Arc::new(StaticPrivileges::new(config.moderator_set())),
        Arc::new(LoggingActions::new()),
    );

    let contents = tokio::fs::read_to_string(events).await?;
    let (mut admitted, mut rejected, mut skipped, mut failed) = (0, 0, 0, 0);

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match serde_json::from_str::<ContentEvent>(line) {
            Ok(event) => guard.handle(&event).await.map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(outcome) => {
                match outcome {
                    Outcome::Admitted => admitted += 1,
                    Outcome::Rejected { .. } => rejected += 1,
                    Outcome::Skipped { .. } => skipped += 1,
                }
                println!("{}", serde_json::to_string(&outcome)?);
            }
            Err(e) => {
                failed += 1;
                error!(line = index + 1, error = %e, "Failed to process event");
            }
        }
    }

    info!(
        admitted = admitted,
        rejected = rejected,
        skipped = skipped,
        failed = failed,
        "Replay finished"
    );
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
