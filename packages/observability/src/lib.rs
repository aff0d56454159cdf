//! # Observability
//!
//! Logging setup for the Mikasa binaries.
//!
//! Binaries call [`init_with_config`] once at startup and then use the plain
//! `tracing` macros. Two sinks are available:
//!
//! - a compact human-readable stream on stderr
//! - an optional JSONL file (one object per event) for `tail -f | jq`
//!
//! `RUST_LOG` always wins over the configured default level.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "mikasa".into(),
//!     default_level: "debug".into(),
//!     log_path: Some("/var/log/mikasa.jsonl".into()),
//!     ..Default::default()
//! })?;
//! tracing::info!("ready");
//! ```

mod file_sink;
mod json_layer;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file_sink::{LogFileWriter, LogFileWriterFactory};
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, written into every JSONL entry.
    pub service_name: String,

    /// Default filter (e.g. "info", "mikasa=debug").
    /// Overridden by `RUST_LOG` when set.
    pub default_level: String,

    /// JSONL file sink. `None` disables file output.
    pub log_path: Option<PathBuf>,

    /// Emit compact logs on stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging for `service_name` with the default configuration.
pub fn init(service_name: &str) -> io::Result<()> {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    })
}

/// Initialize logging with a custom configuration.
///
/// Fails only when the JSONL file cannot be opened. Installing a second
/// global subscriber (as happens across tests) is ignored.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let file_layer = match &config.log_path {
        Some(path) => {
            let writer = LogFileWriter::open(path)?;
            Some(
                JsonLayer::new(config.service_name.clone(), LogFileWriterFactory::new(writer))
                    .with_filter(env_filter(&config.default_level)),
            )
        }
        None => None,
    };

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .compact()
            .with_writer(io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            service = %config.service_name,
            log_path = ?config.log_path,
            "observability initialized"
        );
    }

    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};
