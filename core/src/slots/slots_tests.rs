use clanboard_types::{BossSlot, Server};

use crate::board::BossBoard;
use crate::error::ErrorKind;
use crate::game_data::StaticCatalog;
use crate::group::{GroupMeta, GroupRecord};
use crate::session::ChallengeSession;
use crate::storage::{BackupRecord, WriteOp};

use super::*;

fn record(catalog: &StaticCatalog) -> GroupRecord {
    GroupRecord {
        id: 42,
        meta: GroupMeta::new(Server::Tw, None),
        data_slot: 0,
        board: BossBoard::fresh(Server::Tw, catalog),
        sessions: Default::default(),
        subscriptions: Default::default(),
    }
}

fn boss(n: u8) -> BossSlot {
    BossSlot::new(n).unwrap()
}

#[test]
fn first_unused_finds_gap_or_next() {
    assert_eq!(first_unused_slot(&[]), 0);
    assert_eq!(first_unused_slot(&[0, 1, 2]), 3);
    assert_eq!(first_unused_slot(&[0, 2, 3]), 1);
    assert_eq!(first_unused_slot(&[1]), 0);
}

#[test]
fn snapshot_restores_verbatim() {
    let catalog = StaticCatalog::default();
    let mut live = record(&catalog);
    live.board.defeat(boss(1)).unwrap();
    live.sessions
        .apply(ChallengeSession::new(7, boss(2), false, None))
        .unwrap();
    live.subscriptions.subscribe(boss(3), 8, "note").unwrap();
    live.meta.threshold = 1_000;

    let stored = BackupSnapshot::capture(&live).to_record().unwrap();
    let mut other = record(&catalog);
    other.data_slot = 5;
    BackupSnapshot::from_record(&stored).unwrap().restore_into(&mut other);

    assert_eq!(other, live);
}

#[test]
fn unknown_snapshot_version_is_invalid() {
    let catalog = StaticCatalog::default();
    let mut snapshot = BackupSnapshot::capture(&record(&catalog));
    snapshot.version = 99;
    let stored = BackupRecord {
        group: 42,
        slot: 0,
        blob: serde_json::to_string(&snapshot).unwrap(),
    };

    let err = BackupSnapshot::from_record(&stored).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn switch_to_unused_slot_starts_fresh() {
    let catalog = StaticCatalog::default();
    let mut live = record(&catalog);
    live.board.defeat(boss(4)).unwrap();
    live.subscriptions.subscribe(boss(4), 1, "").unwrap();
    let left = live.clone();

    let op = switch(&mut live, 3, None, &catalog).unwrap();

    let WriteOp::PutBackup(backup) = op else {
        panic!("expected a backup write");
    };
    assert_eq!(backup.slot, 0);
    assert_eq!(BackupSnapshot::from_record(&backup).unwrap().board, left.board);
    assert_eq!(live.data_slot, 3);
    assert_eq!(live.board, BossBoard::fresh(Server::Tw, &catalog));
    assert!(live.subscriptions.is_empty());
}

#[test]
fn switch_back_restores_backup() {
    let catalog = StaticCatalog::default();
    let mut live = record(&catalog);
    live.board.apply_damage(boss(2), 1_234).unwrap();
    let original = live.clone();

    let WriteOp::PutBackup(slot0) = switch(&mut live, 1, None, &catalog).unwrap() else {
        panic!("expected a backup write");
    };
    switch(&mut live, 0, Some(&slot0), &catalog).unwrap();

    assert_eq!(live, original);
}
