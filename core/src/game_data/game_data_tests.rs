//! Tests for the boss catalog, server codes, and the game calendar

use chrono::{TimeZone, Utc};
use clanboard_types::{BossSlot, BossTableConfig, Server, StageConfig};

use super::*;

fn two_stage_catalog() -> StaticCatalog {
    StaticCatalog::uniform(vec![
        StageConfig {
            first_cycle: 1,
            last_cycle: 3,
            health: [100, 200, 300, 400, 500],
        },
        StageConfig {
            first_cycle: 4,
            last_cycle: 10,
            health: [1_000, 2_000, 3_000, 4_000, 5_000],
        },
    ])
}

// ═══════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn stage_lookup_follows_cycle_ranges() {
    let catalog = two_stage_catalog();
    assert_eq!(catalog.stage_for_cycle(Server::Cn, 1), 0);
    assert_eq!(catalog.stage_for_cycle(Server::Cn, 3), 0);
    assert_eq!(catalog.stage_for_cycle(Server::Cn, 4), 1);
    // Past the last range clamps to the last stage
    assert_eq!(catalog.stage_for_cycle(Server::Cn, 99), 1);
}

#[test]
fn same_stage_as_next_detects_boundaries() {
    let catalog = two_stage_catalog();
    assert!(catalog.same_stage_as_next(Server::Jp, 2));
    assert!(!catalog.same_stage_as_next(Server::Jp, 3));
    assert!(catalog.same_stage_as_next(Server::Jp, 4));
}

#[test]
fn health_for_cycle_uses_stage_table() {
    let catalog = two_stage_catalog();
    assert_eq!(catalog.health_for_cycle(Server::Tw, 2), [100, 200, 300, 400, 500]);
    let slot = BossSlot::new(3).unwrap();
    assert_eq!(catalog.full_health(Server::Tw, 5, slot), 3_000);
    // Out-of-range stage index clamps to the last stage
    assert_eq!(catalog.stage_health(Server::Tw, 42)[0], 1_000);
}

#[test]
fn empty_override_falls_back_to_builtin_tables() {
    let mut overrides = BossTableConfig::default();
    overrides.kr.push(StageConfig {
        first_cycle: 1,
        last_cycle: u32::MAX,
        health: [1, 2, 3, 4, 5],
    });
    let catalog = StaticCatalog::new(&overrides);
    assert_eq!(catalog.stages(Server::Kr).len(), 1);
    assert_eq!(catalog.stages(Server::Cn), default_stages(Server::Cn).as_slice());
}

#[test]
fn builtin_tables_cover_every_cycle() {
    for server in Server::ALL {
        let stages = default_stages(server);
        assert_eq!(stages[0].first_cycle, 1);
        for pair in stages.windows(2) {
            assert_eq!(pair[0].last_cycle + 1, pair[1].first_cycle, "gap in {server}");
        }
        assert_eq!(stages.last().unwrap().last_cycle, u32::MAX);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Servers
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn parse_server_accepts_codes_and_names() {
    assert_eq!(parse_server("jp"), Some(Server::Jp));
    assert_eq!(parse_server("Taiwan"), Some(Server::Tw));
    assert_eq!(parse_server(" bilibili "), Some(Server::Cn));
    assert_eq!(parse_server("eu"), None);
    assert!(SERVER_CODES.contains_key("kr"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Calendar
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn game_day_rolls_over_at_reset_hour() {
    let calendar = SystemCalendar::new(5);
    // 2024-03-01 20:59 UTC = 04:59 next day in UTC+8, still the previous game day
    let before = calendar.at(Server::Cn, Utc.with_ymd_and_hms(2024, 3, 1, 20, 59, 0).unwrap());
    // 21:00 UTC = 05:00 UTC+8, a new game day
    let after = calendar.at(Server::Cn, Utc.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap());

    assert_eq!(after.date, GameDate(before.date.0 + 1));
    assert_eq!(after.seconds, 0);
    assert_eq!(before.seconds, 86_400 - 60);
}

#[test]
fn server_offset_shifts_the_day() {
    let calendar = SystemCalendar::new(5);
    // 20:30 UTC: 05:30 in Tokyo (new day), 04:30 in Shanghai (old day)
    let instant = Utc.with_ymd_and_hms(2024, 3, 1, 20, 30, 0).unwrap();
    let jp = calendar.at(Server::Jp, instant);
    let cn = calendar.at(Server::Cn, instant);
    assert_eq!(jp.date, GameDate(cn.date.0 + 1));
    assert_eq!(jp.seconds, 30 * 60);
}

#[test]
fn back_filled_clock_moves_to_previous_day() {
    let clock = GameClock {
        date: GameDate(100),
        seconds: 3_600,
    };
    let filled = clock.back_filled();
    assert_eq!(filled.date, GameDate(99));
    assert_eq!(filled.seconds, 3_600 + 86_400);
}

#[test]
fn fixed_calendar_advances() {
    let calendar = FixedCalendar::new(GameDate(10), 86_000);
    calendar.advance_seconds(1_000);
    let now = calendar.now(Server::Cn);
    assert_eq!(now.date, GameDate(11));
    assert_eq!(now.seconds, 600);

    calendar.advance_days(2);
    assert_eq!(calendar.today(Server::Cn), GameDate(13));

    calendar.set(GameDate(1), 5);
    assert_eq!(calendar.now(Server::Kr), GameClock { date: GameDate(1), seconds: 5 });
}
