//! Process-lifetime state shared by the dispatcher and handlers.

use crate::provider::Provider;
use bot_config_and_utils::Config;
use bot_database::{Database, Ledger, Registry};
use std::time::Duration;

/// Runtime knobs derived from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub community: String,
    pub flair_keyword: String,
    pub ledger_retention: Option<usize>,
    pub idle_interval: Duration,
    pub error_backoff: Duration,
}

impl BotSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            community: config.community.clone(),
            flair_keyword: config.flair_keyword.clone(),
            ledger_retention: config.ledger_retention,
            idle_interval: config.idle_interval(),
            error_backoff: config.error_backoff(),
        }
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The authenticated session, the store and the settings, constructed once
/// at startup and handed to the dispatcher.
pub struct BotContext<P> {
    pub provider: P,
    pub db: Database,
    pub settings: BotSettings,
}

impl<P: Provider> BotContext<P> {
    pub fn new(provider: P, db: Database, settings: BotSettings) -> Self {
        Self {
            provider,
            db,
            settings,
        }
    }

    pub fn ledger(&self) -> Ledger<'_> {
        Ledger::new(&self.db, self.settings.ledger_retention)
    }

    pub fn registry(&self) -> Registry<'_> {
        Registry::new(&self.db)
    }
}
