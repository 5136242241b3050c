use clanboard_types::Server;

use super::*;

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clanboard.toml");

    let mut config = EngineConfig::default();
    config.auto_upgrade_compensation = false;
    config.data_file = Some("data/clanboard.json".into());
    config.default_server = Server::Kr;
    config.save_to(&path).unwrap();

    let loaded = EngineConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.toml");

    let loaded = EngineConfig::load_from(&path).unwrap();

    assert_eq!(loaded, EngineConfig::default());
    assert!(path.exists());
}

#[test]
fn out_of_range_reset_hour_is_rejected() {
    let config = EngineConfig {
        day_reset_hour: 24,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
}

#[test]
fn inverted_stage_range_is_rejected() {
    let mut config = EngineConfig::default();
    config.boss_tables.cn.push(StageConfig {
        first_cycle: 5,
        last_cycle: 4,
        health: [1; 5],
    });
    assert!(config.validate().is_err());
}
