//! Mikasa binary entry point.
//!
//! Usage: mikasa [--base-dir <dir>] [--log-level <level>] [run | subscribers | stats]
//!
//! Credentials come from `<base-dir>/cred.txt` or the `MIKASA_*` environment
//! variables.

use bot_config_and_utils::{init_logging, Config, Credentials, Paths};
use bot_database::Database;
use clap::{Parser, Subcommand};
use mikasa::{BotContext, BotSettings, Dispatcher, MikasaResult, RedditProvider};
use std::path::PathBuf;
use tracing::{error, info};

/// Mikasa: relays paid requests to subscribers.
#[derive(Parser, Debug)]
#[command(name = "mikasa")]
#[command(about = "Subscription bot that relays paid requests to subscribers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MIKASA_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Base directory for config, credentials, database and logs. Defaults to ~/.mikasa
    #[arg(long, env = "MIKASA_BASE_DIR", global = true)]
    base_dir: Option<PathBuf>,

    /// Community to watch, overriding the config file
    #[arg(long, global = true)]
    community: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch the inbox and the community (default)
    Run,
    /// Print the current subscribers
    Subscribers,
    /// Print the size of each stored collection
    Stats,
}

#[tokio::main]
async fn main() -> MikasaResult<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    paths.ensure_dirs()?;

    let mut config = Config::load(&paths)?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(community) = cli.community {
        config.community = community;
    }
    config.validate()?;

    init_logging(&config.log_level, Some(paths.log_file()))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&paths, &config).await,
        Commands::Subscribers => {
            let db = Database::open(&paths.database_file())?;
            for subscriber in bot_database::Registry::new(&db).subscribers()? {
                println!("{subscriber}");
            }
            Ok(())
        }
        Commands::Stats => {
            let db = Database::open(&paths.database_file())?;
            println!("{}", serde_json::to_string_pretty(&db.stats()?)?);
            Ok(())
        }
    }
}

async fn run(paths: &Paths, config: &Config) -> MikasaResult<()> {
    info!(base_dir = %paths.base_dir().display(), "Mikasa starting...");

    let db = Database::open(&paths.database_file()).map_err(|e| {
        error!(error = %e, "Cannot open the database, refusing to start");
        e
    })?;
    let stats = db.stats()?;
    info!(
        processed_messages = stats.processed_messages,
        processed_submissions = stats.processed_submissions,
        subscribers = stats.subscribers,
        "Database loaded"
    );

    let credentials = Credentials::load(paths)?;
    let provider = RedditProvider::authenticate(credentials, config)
        .await
        .map_err(|e| {
            error!(error = %e, "Authentication failed");
            e
        })?;

    let ctx = BotContext::new(provider, db, BotSettings::from_config(config));
    let mut dispatcher = Dispatcher::new(ctx);

    let ctrl_c = tokio::signal::ctrl_c();

    tokio::select! {
        result = dispatcher.run() => {
            if let Err(e) = result {
                error!(error = %e, "Dispatcher exited with error");
                return Err(e);
            }
        }
        _ = ctrl_c => {
            info!("Received shutdown signal, exiting...");
        }
    }

    Ok(())
}
