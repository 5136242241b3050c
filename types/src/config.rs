use serde::{Deserialize, Serialize};

use crate::{BOSS_COUNT, Server};

// ─────────────────────────────────────────────────────────────────────────────
// Boss Tables
// ─────────────────────────────────────────────────────────────────────────────

/// One difficulty stage: an inclusive cycle range and the five boss health pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub first_cycle: u32,
    pub last_cycle: u32,
    pub health: [u64; BOSS_COUNT],
}

impl StageConfig {
    pub fn contains(&self, cycle: u32) -> bool {
        (self.first_cycle..=self.last_cycle).contains(&cycle)
    }
}

/// Stage tables per server. A server left empty uses the built-in defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BossTableConfig {
    #[serde(default)]
    pub jp: Vec<StageConfig>,
    #[serde(default)]
    pub tw: Vec<StageConfig>,
    #[serde(default)]
    pub cn: Vec<StageConfig>,
    #[serde(default)]
    pub kr: Vec<StageConfig>,
}

impl BossTableConfig {
    pub fn stages(&self, server: Server) -> &[StageConfig] {
        match server {
            Server::Jp => &self.jp,
            Server::Tw => &self.tw,
            Server::Cn => &self.cn,
            Server::Kr => &self.kr,
        }
    }

    pub fn stages_mut(&mut self, server: Server) -> &mut Vec<StageConfig> {
        match server {
            Server::Jp => &mut self.jp,
            Server::Tw => &mut self.tw,
            Server::Cn => &mut self.cn,
            Server::Kr => &mut self.kr,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long a long-poll waiter blocks before reporting "unchanged"
    #[serde(default = "default_long_poll_secs")]
    pub long_poll_timeout_secs: u64,
    /// Treat a normal attempt as compensation when only compensation attempts remain
    #[serde(default = "default_true")]
    pub auto_upgrade_compensation: bool,
    /// Hour of server-local time at which the game day rolls over
    #[serde(default = "default_reset_hour")]
    pub day_reset_hour: u32,
    /// JSON document used by the file-backed store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,
    /// Server the CLI uses when creating a group without naming one
    #[serde(default)]
    pub default_server: Server,
    #[serde(default)]
    pub boss_tables: BossTableConfig,
}

fn default_long_poll_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_reset_hour() -> u32 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            long_poll_timeout_secs: default_long_poll_secs(),
            auto_upgrade_compensation: true,
            day_reset_hour: default_reset_hour(),
            data_file: None,
            default_server: Server::default(),
            boss_tables: BossTableConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.long_poll_timeout_secs, 30);
        assert!(config.auto_upgrade_compensation);
    }

    #[test]
    fn parses_stage_override() {
        let doc = r#"
            auto_upgrade_compensation = false
            default_server = "jp"

            [[boss_tables.jp]]
            first_cycle = 1
            last_cycle = 3
            health = [100, 200, 300, 400, 500]
        "#;
        let config: EngineConfig = toml::from_str(doc).unwrap();
        assert!(!config.auto_upgrade_compensation);
        assert_eq!(config.default_server, Server::Jp);
        let stages = config.boss_tables.stages(Server::Jp);
        assert_eq!(stages.len(), 1);
        assert!(stages[0].contains(3));
        assert!(!stages[0].contains(4));
        assert!(config.boss_tables.stages(Server::Cn).is_empty());
    }
}
