//! Logging initialization for the bot.
//!
//! Thin wrapper over the observability crate: stderr for the foreground
//! process plus an optional JSONL file.

use crate::CoreResult;
use std::path::PathBuf;

/// Initialize logging for the `mikasa` service.
///
/// `level` is the default filter; `RUST_LOG` takes precedence when set.
/// When `log_file` is given, every event is also appended to it as JSONL.
///
/// ```ignore
/// init_logging("info", Some(paths.log_file()))?;
/// tracing::info!("Mikasa started");
/// ```
pub fn init_logging(level: &str, log_file: Option<PathBuf>) -> CoreResult<()> {
    observability::init_with_config(observability::LogConfig {
        service_name: "mikasa".into(),
        default_level: level.into(),
        log_path: log_file,
        also_stderr: true,
    })?;
    Ok(())
}
