mod config;
mod error;

#[cfg(test)]
mod config_tests;

pub use config::{BossTableConfig, EngineConfig, EngineConfigExt, StageConfig};
pub use error::ConfigError;
