use clanboard_types::BossSlot;

use crate::error::ErrorKind;

use super::*;

fn boss(n: u8) -> BossSlot {
    BossSlot::new(n).unwrap()
}

fn table_with(entries: &[(i64, u8)]) -> SessionTable {
    let mut table = SessionTable::default();
    for &(member, b) in entries {
        table.apply(ChallengeSession::new(member, boss(b), false, None)).unwrap();
    }
    table
}

#[test]
fn second_apply_conflicts_until_removed() {
    let mut table = table_with(&[(10, 1)]);

    let err = table
        .apply(ChallengeSession::new(10, boss(2), false, None))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    table.remove(10).unwrap();
    table.apply(ChallengeSession::new(10, boss(2), false, None)).unwrap();
    assert_eq!(table.get(10).unwrap().boss, boss(2));
}

#[test]
fn proxy_equal_to_member_is_dropped() {
    let session = ChallengeSession::new(5, boss(1), false, Some(5));
    assert_eq!(session.proxy, None);
    let session = ChallengeSession::new(5, boss(1), true, Some(6));
    assert_eq!(session.proxy, Some(6));
}

#[test]
fn report_overwrites_and_clears() {
    let mut table = table_with(&[(10, 3)]);

    table.report(10, 20, 1_000).unwrap();
    table.report(10, 12, 4_000).unwrap();
    let s = table.get(10).unwrap();
    assert_eq!((s.paused_seconds, s.pending_damage), (12, 4_000));

    assert!(table.report_clear(10).unwrap());
    assert!(!table.report_clear(10).unwrap());

    let err = table.report(99, 1, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn tree_flag_lifecycle() {
    let mut table = table_with(&[(10, 3), (11, 3), (12, 4)]);

    table.enter_tree(10, Some("stuck at 5s".into())).unwrap();
    table.enter_tree(12, None).unwrap();
    let err = table.enter_tree(10, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(table.tree(None).count(), 2);
    let on_three: Vec<_> = table.tree(Some(boss(3))).map(|s| s.member).collect();
    assert_eq!(on_three, vec![10]);

    table.exit_tree(10).unwrap();
    assert_eq!(table.get(10).unwrap().note, None);
    let err = table.exit_tree(11).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn remove_boss_keeps_other_bosses() {
    let mut table = table_with(&[(10, 3), (11, 3), (12, 4)]);

    let removed = table.remove_boss(boss(3));

    assert_eq!(removed.iter().map(|s| s.member).collect::<Vec<_>>(), vec![10, 11]);
    assert_eq!(table.len(), 1);
    assert!(table.get(12).is_some());
    assert_eq!(table.clear(), 1);
    assert!(table.is_empty());
}

#[test]
fn retarget_moves_session() {
    let mut table = table_with(&[(10, 3)]);
    table.retarget(10, boss(5)).unwrap();
    assert_eq!(table.on_boss(boss(5)).count(), 1);
    assert_eq!(table.on_boss(boss(3)).count(), 0);
}
