//! Tests for BossBoard targeting, rollover, undo and manual edits
//!
//! Verifies that:
//! - Exactly one pool is authoritative per slot
//! - Clearing the fifth boss rolls the cycle and repopulates the next pool
//! - Undo restores the board bit-for-bit for single-step reversals

use clanboard_types::{BossSlot, Server, StageConfig};

use crate::error::ErrorKind;
use crate::game_data::{BossCatalog, StaticCatalog};

use super::*;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const STAGE1: [u64; 5] = [60_000, 80_000, 100_000, 120_000, 150_000];
const STAGE2: [u64; 5] = [200_000, 220_000, 250_000, 280_000, 300_000];
const STAGE3: [u64; 5] = [400_000, 420_000, 450_000, 480_000, 500_000];

fn catalog() -> StaticCatalog {
    StaticCatalog::uniform(vec![
        StageConfig {
            first_cycle: 1,
            last_cycle: 3,
            health: STAGE1,
        },
        StageConfig {
            first_cycle: 4,
            last_cycle: 6,
            health: STAGE2,
        },
        StageConfig {
            first_cycle: 7,
            last_cycle: u32::MAX,
            health: STAGE3,
        },
    ])
}

fn boss(n: u8) -> BossSlot {
    BossSlot::new(n).unwrap()
}

fn defeat_all(board: &mut BossBoard, catalog: &StaticCatalog) -> Option<Rollover> {
    let mut rolled = None;
    for slot in BossSlot::all() {
        if board.now_health[slot.index()] > 0 {
            board.defeat(slot).unwrap();
            rolled = board.roll_over_if_cleared(Server::Cn, catalog);
        }
    }
    rolled
}

// ═══════════════════════════════════════════════════════════════════════════
// Targeting
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fresh_board_starts_at_stage_one() {
    let catalog = catalog();
    let board = BossBoard::fresh(Server::Cn, &catalog);
    assert_eq!(board.cycle, 1);
    assert_eq!(board.now_health, STAGE1);
    assert_eq!(board.next_health, STAGE1);
}

#[test]
fn defeat_credits_full_health() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);

    let hit = board.defeat(boss(3)).unwrap();

    assert_eq!(hit.health, 100_000);
    assert_eq!(hit.pool, Pool::Now);
    assert_eq!(board.now_health[2], 0);
    assert!(board.roll_over_if_cleared(Server::Cn, &catalog).is_none());
}

#[test]
fn dead_boss_is_fought_in_next_cycle() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.defeat(boss(1)).unwrap();

    let target = board.attack_target(boss(1), Server::Cn, &catalog).unwrap();
    assert_eq!(target.pool, Pool::Next);
    assert_eq!(target.cycle, 2);
    assert_eq!(target.health, STAGE1[0]);
}

#[test]
fn both_pools_empty_is_invalid_state() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.defeat(boss(2)).unwrap();
    board.defeat(boss(2)).unwrap();

    let err = board.health_for(boss(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBossState);
}

#[test]
fn next_cycle_unreachable_across_stage_boundary() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.cycle = 3;
    board.next_health = STAGE2;
    board.defeat(boss(4)).unwrap();

    assert!(!board.is_reachable(boss(4), Server::Cn, &catalog));
    let err = board.attack_target(boss(4), Server::Cn, &catalog).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidBossState);
    // The view shows zero health for the blocked boss
    let view = board.view(Server::Cn, &catalog);
    assert_eq!(view.bosses[3].health, 0);
    assert!(view.bosses[3].is_next);
}

#[test]
fn damage_must_leave_boss_alive() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);

    let err = board.apply_damage(boss(1), STAGE1[0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(board.now_health[0], STAGE1[0]);

    let hit = board.apply_damage(boss(1), 10_000).unwrap();
    assert_eq!(hit.health, STAGE1[0] - 10_000);
    assert_eq!(board.now_health[0], STAGE1[0] - 10_000);
}

// ═══════════════════════════════════════════════════════════════════════════
// Rollover
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn clearing_the_cycle_rolls_over() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    let prior_next = board.next_health;

    let rolled = defeat_all(&mut board, &catalog).unwrap();

    assert_eq!(rolled.new_cycle, 2);
    assert!(rolled.cleared_on_arrival.is_empty());
    assert_eq!(board.cycle, 2);
    assert_eq!(board.now_health, prior_next);
    assert_eq!(board.next_health, catalog.health_for_cycle(Server::Cn, 3));
}

#[test]
fn rollover_repopulates_from_new_stage() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.cycle = 2;

    defeat_all(&mut board, &catalog).unwrap();

    // Cycle 3 is the last cycle of stage 1; next pool now holds cycle 4 (stage 2)
    assert_eq!(board.cycle, 3);
    assert_eq!(board.next_health, STAGE2);
}

#[test]
fn slot_killed_ahead_rolls_in_at_zero() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.defeat(boss(2)).unwrap();
    board.defeat(boss(2)).unwrap();

    let rolled = defeat_all(&mut board, &catalog).unwrap();

    assert_eq!(rolled.cleared_on_arrival, vec![boss(2)]);
    assert_eq!(board.now_health[1], 0);
    assert_eq!(board.next_health[1], STAGE1[1]);
    // The rolled-in zero slot is fought in cycle 3
    assert_eq!(board.attack_target(boss(2), Server::Cn, &catalog).unwrap().cycle, 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// Undo
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn undo_partial_damage_restores_board() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.apply_damage(boss(5), 1_000).unwrap();
    let before = board.clone();

    let hit = board.apply_damage(boss(5), 42_000).unwrap();
    let effect = board.undo(boss(5), hit.cycle, 42_000, Server::Cn, &catalog);

    assert_eq!(board, before);
    assert_eq!(
        effect,
        UndoEffect::Restored {
            pool: Pool::Now,
            health: STAGE1[4] - 1_000
        }
    );
}

#[test]
fn undo_next_pool_defeat_restores_board() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.defeat(boss(1)).unwrap();
    let before = board.clone();

    let hit = board.defeat(boss(1)).unwrap();
    board.undo(boss(1), hit.cycle, hit.health, Server::Cn, &catalog);

    assert_eq!(board, before);
}

#[test]
fn undo_clamps_to_stage_maximum() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    board.apply_damage(boss(1), 5_000).unwrap();

    board.undo(boss(1), 1, 999_999, Server::Cn, &catalog);

    assert_eq!(board.now_health[0], STAGE1[0]);
}

#[test]
fn undo_of_rollover_attempt_restores_board() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    for n in 1..=4 {
        board.defeat(boss(n)).unwrap();
    }
    board.apply_damage(boss(1), 7_000).unwrap();
    let before = board.clone();

    let hit = board.defeat(boss(5)).unwrap();
    board.roll_over_if_cleared(Server::Cn, &catalog).unwrap();
    let effect = board.undo(boss(5), hit.cycle, hit.health, Server::Cn, &catalog);

    assert_eq!(effect, UndoEffect::RolledBack { cycle: 1 });
    assert_eq!(board, before);
}

#[test]
fn undo_two_rollovers_back_steps_once() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    defeat_all(&mut board, &catalog).unwrap();
    defeat_all(&mut board, &catalog).unwrap();
    assert_eq!(board.cycle, 3);
    let now_before = board.now_health;

    // A cycle-1 record is two rollovers behind
    board.undo(boss(3), 1, 100_000, Server::Cn, &catalog);

    assert_eq!(board.cycle, 2);
    assert_eq!(board.next_health, now_before);
    assert_eq!(board.now_health, [0, 0, 100_000, 0, 0]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Manual Edits
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn modify_sets_health_and_cycle() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);

    board
        .modify(
            Some(4),
            &[(boss(1), BoardEdit::Current(1_234)), (boss(2), BoardEdit::NextCycle(5_678))],
            Server::Cn,
            &catalog,
        )
        .unwrap();

    assert_eq!(board.cycle, 4);
    assert_eq!(board.now_health[0], 1_234);
    assert_eq!(board.next_health[0], STAGE2[0]);
    assert_eq!(board.now_health[1], 0);
    assert_eq!(board.next_health[1], 5_678);
}

#[test]
fn modify_rejects_next_cycle_across_stage() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    let before = board.clone();

    let err = board
        .modify(Some(3), &[(boss(1), BoardEdit::NextCycle(10))], Server::Cn, &catalog)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(board, before);
    assert!(board.modify(Some(0), &[], Server::Cn, &catalog).is_err());
}

#[test]
fn modify_rejects_out_of_range_cycle() {
    let catalog = catalog();
    let mut board = BossBoard::fresh(Server::Cn, &catalog);
    let before = board.clone();

    for cycle in [u32::MAX, MAX_CYCLE + 1] {
        let err = board.modify(Some(cycle), &[], Server::Cn, &catalog).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
    assert_eq!(board, before);

    board.modify(Some(MAX_CYCLE), &[], Server::Cn, &catalog).unwrap();
    assert_eq!(board.cycle, MAX_CYCLE);
}
