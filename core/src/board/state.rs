use clanboard_types::{BOSS_COUNT, BoardView, BossSlot, BossView, Server};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::game_data::BossCatalog;

/// Highest cycle a manual edit may set
pub const MAX_CYCLE: u32 = 1_000_000;

/// Which health pool an attempt lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Now,
    Next,
}

/// The boss instance an attempt would hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTarget {
    pub boss: BossSlot,
    pub pool: Pool,
    /// Cycle of the targeted instance (board cycle, or board cycle + 1 for the next pool)
    pub cycle: u32,
    pub health: u64,
}

/// Result of a cycle rollover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover {
    pub new_cycle: u32,
    /// Slots whose next-cycle instance was already dead when it rolled in
    pub cleared_on_arrival: Vec<BossSlot>,
}

/// One slot of a manual board edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "health", rename_all = "snake_case")]
pub enum BoardEdit {
    /// Set the current-cycle health; next cycle resets to full
    Current(u64),
    /// Current instance is dead, next-cycle instance has this much left
    NextCycle(u64),
}

/// What an undo did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoEffect {
    /// Damage returned to the pool the record hit
    Restored { pool: Pool, health: u64 },
    /// One rollover step was reversed
    RolledBack { cycle: u32 },
}

/// Current and next cycle health for the five boss slots.
///
/// A slot whose current pool is empty is fought in its next-cycle instance,
/// so each slot always has exactly one authoritative pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossBoard {
    pub cycle: u32,
    pub now_health: [u64; BOSS_COUNT],
    pub next_health: [u64; BOSS_COUNT],
}

impl BossBoard {
    /// Stage-1 board: cycle 1 at full health, cycle 2 queued behind it
    pub fn fresh(server: Server, catalog: &dyn BossCatalog) -> Self {
        Self {
            cycle: 1,
            now_health: catalog.health_for_cycle(server, 1),
            next_health: catalog.health_for_cycle(server, 2),
        }
    }

    /// Instance an attempt on `boss` would hit, ignoring stage boundaries
    pub fn health_for(&self, boss: BossSlot) -> Result<DamageTarget, EngineError> {
        let i = boss.index();
        match (self.now_health[i], self.next_health[i]) {
            (0, 0) => Err(EngineError::InvalidBossState {
                boss,
                reason: "both the current and the next cycle instance are defeated",
            }),
            (0, next) => Ok(DamageTarget {
                boss,
                pool: Pool::Next,
                cycle: self.cycle + 1,
                health: next,
            }),
            (now, _) => Ok(DamageTarget {
                boss,
                pool: Pool::Now,
                cycle: self.cycle,
                health: now,
            }),
        }
    }

    /// True when the boss can be attacked right now.
    ///
    /// A next-cycle instance is only reachable while the following cycle is
    /// in the same stage.
    pub fn is_reachable(&self, boss: BossSlot, server: Server, catalog: &dyn BossCatalog) -> bool {
        let i = boss.index();
        if self.now_health[i] > 0 {
            return true;
        }
        self.next_health[i] > 0 && catalog.same_stage_as_next(server, self.cycle)
    }

    /// [`health_for`](Self::health_for) plus the stage check
    pub fn attack_target(
        &self,
        boss: BossSlot,
        server: Server,
        catalog: &dyn BossCatalog,
    ) -> Result<DamageTarget, EngineError> {
        let target = self.health_for(boss)?;
        if !self.is_reachable(boss, server, catalog) {
            return Err(EngineError::InvalidBossState {
                boss,
                reason: "the next cycle is in a new stage; defeat every boss of this cycle first",
            });
        }
        Ok(target)
    }

    /// Subtract damage that leaves the boss alive
    pub fn apply_damage(&mut self, boss: BossSlot, damage: u64) -> Result<DamageTarget, EngineError> {
        let target = self.health_for(boss)?;
        if damage >= target.health {
            return Err(EngineError::invalid(format!(
                "damage {damage} reaches the remaining {} health of boss {boss}; report a defeat instead",
                target.health
            )));
        }
        *self.pool_mut(target.pool, boss) -= damage;
        Ok(DamageTarget {
            health: target.health - damage,
            ..target
        })
    }

    /// Zero the targeted pool, returning the health it had (the credited damage)
    pub fn defeat(&mut self, boss: BossSlot) -> Result<DamageTarget, EngineError> {
        let target = self.health_for(boss)?;
        *self.pool_mut(target.pool, boss) = 0;
        Ok(target)
    }

    pub fn all_cleared(&self) -> bool {
        self.now_health.iter().all(|&h| h == 0)
    }

    /// Advance one cycle if every current instance is dead
    pub fn roll_over_if_cleared(&mut self, server: Server, catalog: &dyn BossCatalog) -> Option<Rollover> {
        if !self.all_cleared() {
            return None;
        }
        self.cycle += 1;
        self.now_health = self.next_health;
        self.next_health = catalog.health_for_cycle(server, self.cycle + 1);
        let cleared_on_arrival = BossSlot::all()
            .filter(|slot| self.now_health[slot.index()] == 0)
            .collect();
        Some(Rollover {
            new_cycle: self.cycle,
            cleared_on_arrival,
        })
    }

    /// Reverse one recorded attempt.
    ///
    /// `record_cycle` is the cycle of the instance the record hit. A record
    /// from before the latest rollover reverses exactly one rollover step.
    pub fn undo(
        &mut self,
        boss: BossSlot,
        record_cycle: u32,
        damage: u64,
        server: Server,
        catalog: &dyn BossCatalog,
    ) -> UndoEffect {
        let i = boss.index();
        if record_cycle < self.cycle {
            self.next_health = self.now_health;
            self.now_health = [0; BOSS_COUNT];
            self.now_health[i] = damage;
            self.cycle -= 1;
            return UndoEffect::RolledBack { cycle: self.cycle };
        }

        let pool = if record_cycle == self.cycle { Pool::Now } else { Pool::Next };
        let full = catalog.full_health(server, record_cycle, boss);
        let slot = self.pool_mut(pool, boss);
        *slot = slot.saturating_add(damage).min(full);
        UndoEffect::Restored { pool, health: *slot }
    }

    /// Privileged manual edit. `cycle` defaults to the current one.
    pub fn modify(
        &mut self,
        cycle: Option<u32>,
        entries: &[(BossSlot, BoardEdit)],
        server: Server,
        catalog: &dyn BossCatalog,
    ) -> Result<(), EngineError> {
        let cycle = cycle.unwrap_or(self.cycle);
        if !(1..=MAX_CYCLE).contains(&cycle) {
            return Err(EngineError::invalid(format!("cycle must be between 1 and {MAX_CYCLE}")));
        }
        let next_full = catalog.health_for_cycle(server, cycle + 1);
        let same_stage = catalog.same_stage_as_next(server, cycle);

        let mut edited = self.clone();
        for &(boss, edit) in entries {
            let i = boss.index();
            match edit {
                BoardEdit::Current(health) => {
                    edited.now_health[i] = health;
                    edited.next_health[i] = next_full[i];
                }
                BoardEdit::NextCycle(_) if !same_stage => {
                    return Err(EngineError::invalid(
                        "a boss can only be moved to the next cycle while both cycles are in the same stage",
                    ));
                }
                BoardEdit::NextCycle(health) => {
                    edited.now_health[i] = 0;
                    edited.next_health[i] = health;
                }
            }
        }
        edited.cycle = cycle;
        *self = edited;
        Ok(())
    }

    /// Stage maximum of the instance currently shown for a slot
    pub fn full_health(&self, boss: BossSlot, server: Server, catalog: &dyn BossCatalog) -> u64 {
        let cycle = if self.now_health[boss.index()] == 0 {
            self.cycle + 1
        } else {
            self.cycle
        };
        catalog.full_health(server, cycle, boss)
    }

    pub fn view(&self, server: Server, catalog: &dyn BossCatalog) -> BoardView {
        let bosses = BossSlot::all()
            .map(|slot| {
                let i = slot.index();
                let is_next = self.now_health[i] == 0;
                let reachable = self.is_reachable(slot, server, catalog);
                let health = match (reachable, is_next) {
                    (false, _) => 0,
                    (true, true) => self.next_health[i],
                    (true, false) => self.now_health[i],
                };
                BossView {
                    slot,
                    cycle: if is_next { self.cycle + 1 } else { self.cycle },
                    is_next,
                    health,
                    full_health: self.full_health(slot, server, catalog),
                    reachable,
                }
            })
            .collect();
        BoardView {
            cycle: self.cycle,
            stage: catalog.stage_for_cycle(server, self.cycle),
            bosses,
        }
    }

    fn pool_mut(&mut self, pool: Pool, boss: BossSlot) -> &mut u64 {
        match pool {
            Pool::Now => &mut self.now_health[boss.index()],
            Pool::Next => &mut self.next_health[boss.index()],
        }
    }
}
