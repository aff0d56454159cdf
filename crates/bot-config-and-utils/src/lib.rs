//! Configuration, file-system paths, credentials and logging setup for Mikasa.

mod config;
mod credentials;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_AUTH_URL, DEFAULT_COMMUNITY, DEFAULT_FLAIR_KEYWORD,
    DEFAULT_LOG_LEVEL,
};
pub use credentials::Credentials;
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
