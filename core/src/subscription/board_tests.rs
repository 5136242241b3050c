use clanboard_types::BossSlot;

use crate::error::ErrorKind;

use super::*;

fn boss(n: u8) -> BossSlot {
    BossSlot::new(n).unwrap()
}

#[test]
fn duplicate_subscription_conflicts() {
    let mut board = SubscriptionBoard::default();
    board.subscribe(boss(2), 10, "").unwrap();
    let err = board.subscribe(boss(2), 10, "again").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    // Same member, different boss is fine
    board.subscribe(boss(3), 10, "").unwrap();
}

#[test]
fn fire_is_one_shot_and_ordered() {
    let mut board = SubscriptionBoard::default();
    board.subscribe(boss(4), 30, "third").unwrap();
    board.subscribe(boss(4), 10, "").unwrap();
    board.subscribe(boss(1), 20, "").unwrap();

    let reminder = board.fire(boss(4)).unwrap();

    assert_eq!(reminder.members(), vec![30, 10]);
    assert_eq!(reminder.subscribers[0].1, "third");
    assert!(board.fire(boss(4)).is_none());
    assert!(board.is_subscribed(boss(1), 20));
}

#[test]
fn cancel_one_or_all() {
    let mut board = SubscriptionBoard::default();
    board.subscribe(boss(5), 1, "").unwrap();
    board.subscribe(boss(5), 2, "").unwrap();
    board.subscribe(boss(5), 3, "").unwrap();

    assert_eq!(board.cancel(boss(5), Some(2)).unwrap(), 1);
    let err = board.cancel(boss(5), Some(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(board.cancel(boss(5), None).unwrap(), 2);
    assert!(board.is_empty());
}

#[test]
fn table_lists_by_boss_or_fails_when_empty() {
    let mut board = SubscriptionBoard::default();
    assert_eq!(board.table().unwrap_err().kind(), ErrorKind::NotFound);

    board.subscribe(boss(3), 1, "after 2").unwrap();
    board.subscribe(boss(1), 2, "").unwrap();

    let table = board.table().unwrap();
    assert_eq!(table[0].boss, boss(1));
    assert_eq!(table[1].note, "after 2");
}
