//! Tests for the in-memory and JSON file stores

use clanboard_types::{BossSlot, Server};

use crate::board::BossBoard;
use crate::game_data::{GameDate, StaticCatalog};
use crate::group::{GroupMeta, GroupRecord, Member, Role};
use crate::ledger::{ChallengeFilter, NewChallenge};

use super::*;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn group_record(id: i64) -> GroupRecord {
    GroupRecord {
        id,
        meta: GroupMeta::new(Server::Jp, Some("test clan".into())),
        data_slot: 0,
        board: BossBoard::fresh(Server::Jp, &StaticCatalog::default()),
        sessions: Default::default(),
        subscriptions: Default::default(),
    }
}

fn entry(group: i64, slot: u32, member: i64, date: i32) -> NewChallenge {
    NewChallenge {
        group,
        data_slot: slot,
        member,
        proxy: None,
        date: GameDate(date),
        seconds: 100,
        cycle: 1,
        boss: BossSlot::new(2).unwrap(),
        health_remain: 10,
        damage: 90,
        is_continue: false,
        message: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Memory Store
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn sequences_increase_and_are_not_reused() {
    let store = MemoryStore::new();
    let receipt = store
        .commit(vec![
            WriteOp::AppendChallenge(entry(1, 0, 10, 5)),
            WriteOp::AppendChallenge(entry(1, 0, 11, 5)),
            WriteOp::AppendChallenge(entry(2, 0, 10, 5)),
        ])
        .unwrap();
    assert_eq!(receipt.appended, vec![1, 2, 1]);

    store.commit(vec![WriteOp::DeleteChallenge { group: 1, seq: 2 }]).unwrap();
    let receipt = store.commit(vec![WriteOp::AppendChallenge(entry(1, 0, 12, 5))]).unwrap();
    assert_eq!(receipt.appended, vec![3]);

    let seqs: Vec<u64> = store
        .challenges(&ChallengeFilter::group(1))
        .unwrap()
        .iter()
        .map(|r| r.seq)
        .collect();
    assert_eq!(seqs, vec![1, 3]);
}

#[test]
fn challenge_scans_respect_filters() {
    let store = MemoryStore::new();
    store
        .commit(vec![
            WriteOp::AppendChallenge(entry(1, 0, 10, 5)),
            WriteOp::AppendChallenge(entry(1, 1, 10, 5)),
            WriteOp::AppendChallenge(entry(1, 1, 11, 6)),
            WriteOp::AppendChallenge(entry(1, 3, 11, 6)),
        ])
        .unwrap();

    assert_eq!(store.challenges(&ChallengeFilter::group(1)).unwrap().len(), 4);
    assert_eq!(store.challenges(&ChallengeFilter::group(1).slot(1)).unwrap().len(), 2);
    assert_eq!(
        store
            .challenges(&ChallengeFilter::group(1).member(11).date(GameDate(6)))
            .unwrap()
            .len(),
        2
    );
    assert_eq!(store.latest_challenge(1, 1).unwrap().unwrap().seq, 3);
    assert_eq!(store.record_counts(1).unwrap(), vec![(0, 1), (1, 2), (3, 1)]);
    assert_eq!(store.slot_ids(1).unwrap(), vec![0, 1, 3]);

    store.commit(vec![WriteOp::PurgeSlot { group: 1, slot: 1 }]).unwrap();
    assert_eq!(store.slot_ids(1).unwrap(), vec![0, 3]);
    assert!(store.latest_challenge(1, 1).unwrap().is_none());
}

#[test]
fn members_are_listed_in_id_order() {
    let store = MemoryStore::new();
    store
        .commit(vec![
            WriteOp::PutMember(Member::new(1, 30, None, Role::Member)),
            WriteOp::PutMember(Member::new(1, 10, Some("ten".into()), Role::Owner)),
            WriteOp::PutMember(Member::new(2, 20, None, Role::Member)),
        ])
        .unwrap();

    let ids: Vec<i64> = store.members(1).unwrap().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![10, 30]);

    store.commit(vec![WriteOp::DeleteMember { group: 1, member: 10 }]).unwrap();
    assert!(store.member(1, 10).unwrap().is_none());
    assert!(store.member(2, 20).unwrap().is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
// File Store
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn file_store_round_trips_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clanboard.json");

    {
        let store = FileStore::open(&path).unwrap();
        store
            .commit(vec![
                WriteOp::PutGroup(Box::new(group_record(7))),
                WriteOp::PutMember(Member::new(7, 1, Some("alice".into()), Role::Admin)),
                WriteOp::AppendChallenge(entry(7, 0, 1, 3)),
                WriteOp::PutBackup(BackupRecord {
                    group: 7,
                    slot: 2,
                    blob: "{}".into(),
                }),
            ])
            .unwrap();
    }

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.group(7).unwrap(), Some(group_record(7)));
    assert_eq!(reopened.member(7, 1).unwrap().unwrap().role, Role::Admin);
    assert_eq!(reopened.challenges(&ChallengeFilter::group(7)).unwrap().len(), 1);
    assert_eq!(reopened.backup(7, 2).unwrap().unwrap().blob, "{}");

    // Sequence counter survives a reopen
    let receipt = reopened.commit(vec![WriteOp::AppendChallenge(entry(7, 0, 1, 3))]).unwrap();
    assert_eq!(receipt.appended, vec![2]);
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("nested").join("data.json")).unwrap();
    assert!(store.group(1).unwrap().is_none());
    store.commit(vec![WriteOp::PutGroup(Box::new(group_record(1)))]).unwrap();
    assert!(store.path().exists());
}

#[test]
fn corrupt_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(FileStore::open(&path), Err(StoreError::Json(_))));
}

#[test]
fn failed_write_keeps_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = FileStore::open(&path).unwrap();
    store.commit(vec![WriteOp::PutGroup(Box::new(group_record(1)))]).unwrap();

    // A directory where the temp file should go makes the write fail
    std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
    let err = store.commit(vec![WriteOp::PutGroup(Box::new(group_record(2)))]);

    assert!(matches!(err, Err(StoreError::Write { .. })));
    assert!(store.group(2).unwrap().is_none());
    assert!(store.group(1).unwrap().is_some());
}
