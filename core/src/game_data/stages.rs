//! Built-in stage tables.
//!
//! Used for any server whose table is not overridden in the engine config.
//! The last stage of every server is open-ended.

use clanboard_types::{BOSS_COUNT, Server, StageConfig};

struct StageDef {
    first_cycle: u32,
    last_cycle: u32,
    health: [u64; BOSS_COUNT],
}

const fn stage(first_cycle: u32, last_cycle: u32, health: [u64; BOSS_COUNT]) -> StageDef {
    StageDef {
        first_cycle,
        last_cycle,
        health,
    }
}

static CN_STAGES: &[StageDef] = &[
    stage(1, 3, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(4, 10, [8_000_000, 10_000_000, 13_000_000, 15_000_000, 20_000_000]),
    stage(11, 30, [20_000_000, 22_000_000, 25_000_000, 28_000_000, 30_000_000]),
    stage(31, u32::MAX, [30_000_000, 32_000_000, 36_000_000, 38_000_000, 40_000_000]),
];

static TW_STAGES: &[StageDef] = &[
    stage(1, 3, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(4, 10, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(11, 34, [12_000_000, 14_000_000, 17_000_000, 19_000_000, 22_000_000]),
    stage(35, 44, [19_000_000, 20_000_000, 23_000_000, 25_000_000, 27_000_000]),
    stage(45, u32::MAX, [85_000_000, 90_000_000, 95_000_000, 100_000_000, 110_000_000]),
];

static JP_STAGES: &[StageDef] = &[
    stage(1, 3, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(4, 10, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(11, 30, [12_000_000, 14_000_000, 17_000_000, 19_000_000, 22_000_000]),
    stage(31, 38, [19_000_000, 20_000_000, 23_000_000, 25_000_000, 27_000_000]),
    stage(39, u32::MAX, [95_000_000, 100_000_000, 110_000_000, 120_000_000, 130_000_000]),
];

static KR_STAGES: &[StageDef] = &[
    stage(1, 3, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(4, 10, [6_000_000, 8_000_000, 10_000_000, 12_000_000, 15_000_000]),
    stage(11, 34, [12_000_000, 14_000_000, 17_000_000, 19_000_000, 22_000_000]),
    stage(35, u32::MAX, [19_000_000, 20_000_000, 23_000_000, 25_000_000, 27_000_000]),
];

/// Built-in stage table for a server
pub fn default_stages(server: Server) -> Vec<StageConfig> {
    let defs = match server {
        Server::Jp => JP_STAGES,
        Server::Tw => TW_STAGES,
        Server::Cn => CN_STAGES,
        Server::Kr => KR_STAGES,
    };
    defs.iter()
        .map(|d| StageConfig {
            first_cycle: d.first_cycle,
            last_cycle: d.last_cycle,
            health: d.health,
        })
        .collect()
}
