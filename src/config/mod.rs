/// config.toml loading: storage layout and shop settings
pub mod app;

/// Secrets and channel IDs from environment variables
pub mod secrets;

/// Opening the catalog and ledgers at startup
pub mod storage;

pub use app::{AppConfig, load_default_config};
pub use storage::open_shop;
