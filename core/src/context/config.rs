//! Engine configuration
//!
//! This module re-exports the shared config types from clanboard-types and
//! provides confy-backed persistence for [`EngineConfig`].

use std::path::Path;

pub use clanboard_types::{BossTableConfig, EngineConfig, StageConfig};

use super::error::ConfigError;

const APP_NAME: &str = "clanboard";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// EngineConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for EngineConfig persistence
pub trait EngineConfigExt: Sized {
    /// Load from the platform config directory, falling back to defaults
    fn load() -> Self;
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl EngineConfigExt for EngineConfig {
    fn load() -> Self {
        match confy::load::<EngineConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config, using defaults");
                EngineConfig::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = confy::load_path(path)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.day_reset_hour > 23 {
            return Err(ConfigError::Invalid {
                reason: format!("day_reset_hour must be 0-23, got {}", self.day_reset_hour),
            });
        }
        for server in clanboard_types::Server::ALL {
            let stages = self.boss_tables.stages(server);
            if let Some(stage) = stages.iter().find(|s| s.first_cycle > s.last_cycle) {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "{server} stage {}-{} has an empty cycle range",
                        stage.first_cycle, stage.last_cycle
                    ),
                });
            }
        }
        Ok(())
    }
}
