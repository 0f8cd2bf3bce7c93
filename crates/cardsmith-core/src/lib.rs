//! Cardsmith Core - Domain types, error handling, and configuration.

pub mod batch;
pub mod config;
pub mod error;
pub mod models;

pub use batch::{BatchStats, ItemOutcome};
pub use config::HttpConfig;
pub use error::AppError;
pub use models::{CardRecord, GuildUpgrade, GuildUpgradeOption, PublishResult};
