use clanboard_types::{BOSS_COUNT, BossSlot, BossTableConfig, Server, StageConfig};

use super::stages::default_stages;

/// Boss health tables and the cycle -> stage lookup.
///
/// Stage lookup must be monotonic in the cycle number.
pub trait BossCatalog: Send + Sync {
    /// Stage index (0-based) that a cycle belongs to
    fn stage_for_cycle(&self, server: Server, cycle: u32) -> usize;

    /// Full health of the five bosses in a stage
    fn stage_health(&self, server: Server, stage: usize) -> [u64; BOSS_COUNT];

    fn health_for_cycle(&self, server: Server, cycle: u32) -> [u64; BOSS_COUNT] {
        self.stage_health(server, self.stage_for_cycle(server, cycle))
    }

    fn full_health(&self, server: Server, cycle: u32, slot: BossSlot) -> u64 {
        self.health_for_cycle(server, cycle)[slot.index()]
    }

    /// True when `cycle` and `cycle + 1` are in the same stage
    fn same_stage_as_next(&self, server: Server, cycle: u32) -> bool {
        self.stage_for_cycle(server, cycle) == self.stage_for_cycle(server, cycle.saturating_add(1))
    }
}

/// Catalog backed by per-server stage lists.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    tables: BossTableConfig,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(&BossTableConfig::default())
    }
}

impl StaticCatalog {
    /// Build from config overrides; servers without stages get the built-in table.
    pub fn new(overrides: &BossTableConfig) -> Self {
        let mut tables = overrides.clone();
        for server in Server::ALL {
            let stages = tables.stages_mut(server);
            if stages.is_empty() {
                *stages = default_stages(server);
            }
            stages.sort_by_key(|s| s.first_cycle);
        }
        Self { tables }
    }

    /// Catalog where every server uses the same stage list
    pub fn uniform(stages: Vec<StageConfig>) -> Self {
        let mut tables = BossTableConfig::default();
        for server in Server::ALL {
            *tables.stages_mut(server) = stages.clone();
        }
        Self::new(&tables)
    }

    pub fn stages(&self, server: Server) -> &[StageConfig] {
        self.tables.stages(server)
    }
}

impl BossCatalog for StaticCatalog {
    fn stage_for_cycle(&self, server: Server, cycle: u32) -> usize {
        let stages = self.tables.stages(server);
        stages
            .iter()
            .position(|s| s.contains(cycle))
            .unwrap_or_else(|| {
                // Past the table (or before it): clamp to the nearest stage
                match stages.first() {
                    Some(first) if cycle < first.first_cycle => 0,
                    _ => stages.len().saturating_sub(1),
                }
            })
    }

    fn stage_health(&self, server: Server, stage: usize) -> [u64; BOSS_COUNT] {
        let stages = self.tables.stages(server);
        stages
            .get(stage)
            .or_else(|| stages.last())
            .map(|s| s.health)
            .unwrap_or([0; BOSS_COUNT])
    }
}
