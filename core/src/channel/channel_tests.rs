use std::time::Duration;

use clanboard_types::{BoardView, ChangePayload};

use super::*;

fn payload(message: &str) -> ChangePayload {
    ChangePayload {
        board: BoardView {
            cycle: 1,
            stage: 0,
            bosses: Vec::new(),
        },
        cycle: 1,
        message: message.to_string(),
    }
}

#[tokio::test]
async fn every_registered_waiter_gets_the_change_once() {
    let channel = ChangeChannel::new();
    let first = channel.waiter(1);
    let second = channel.waiter(1);

    assert_eq!(channel.resolve(1, payload("boss 3 defeated")), 2);

    for waiter in [first, second] {
        match waiter.wait(Duration::from_secs(1)).await {
            WaitOutcome::Changed(p) => assert_eq!(p.message, "boss 3 defeated"),
            WaitOutcome::Unchanged => panic!("waiter missed the change"),
        }
    }
}

#[tokio::test]
async fn late_waiter_blocks_for_next_change() {
    let channel = ChangeChannel::new();
    let early = channel.waiter(1);
    channel.resolve(1, payload("first"));

    let late = channel.waiter(1);
    assert_eq!(late.wait(Duration::from_millis(20)).await, WaitOutcome::Unchanged);

    let again = channel.waiter(1);
    channel.resolve(1, payload("second"));
    let WaitOutcome::Changed(p) = again.wait(Duration::from_secs(1)).await else {
        panic!("expected the second change");
    };
    assert_eq!(p.message, "second");

    let WaitOutcome::Changed(p) = early.wait(Duration::from_secs(1)).await else {
        panic!("expected the first change");
    };
    assert_eq!(p.message, "first");
}

#[tokio::test]
async fn groups_are_independent() {
    let channel = ChangeChannel::new();
    let other = channel.waiter(2);
    assert_eq!(channel.resolve(1, payload("group one")), 0);
    assert_eq!(other.wait(Duration::from_millis(20)).await, WaitOutcome::Unchanged);
}

#[tokio::test]
async fn dropped_waiter_does_not_affect_others() {
    let channel = ChangeChannel::new();
    let kept = channel.waiter(1);
    drop(channel.waiter(1));
    assert_eq!(channel.waiting(1), 1);

    channel.resolve(1, payload("still delivered"));
    assert!(matches!(
        kept.wait(Duration::from_secs(1)).await,
        WaitOutcome::Changed(_)
    ));
}

#[tokio::test]
async fn waiter_wakes_on_concurrent_resolve() {
    let channel = std::sync::Arc::new(ChangeChannel::new());
    let waiter = channel.waiter(9);
    let resolver = {
        let channel = channel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            channel.resolve(9, payload("later"))
        })
    };

    let outcome = waiter.wait(Duration::from_secs(2)).await;
    assert_eq!(resolver.await.unwrap(), 1);
    assert!(matches!(outcome, WaitOutcome::Changed(p) if p.message == "later"));
}

#[tokio::test]
async fn burst_of_changes_still_yields_the_first() {
    let channel = ChangeChannel::new();
    let waiter = channel.waiter(1);
    for i in 0..40 {
        channel.resolve(1, payload(&format!("change {i}")));
    }

    let WaitOutcome::Changed(p) = waiter.wait(Duration::from_secs(1)).await else {
        panic!("waiter missed the burst");
    };
    assert_eq!(p.message, "change 0");
}

#[tokio::test]
async fn idle_slots_are_released() {
    let channel = ChangeChannel::new();
    let waiter = channel.waiter(5);
    assert_eq!(channel.tracked_groups(), 1);

    channel.release(5);
    assert_eq!(channel.tracked_groups(), 1);

    assert_eq!(waiter.wait(Duration::from_millis(10)).await, WaitOutcome::Unchanged);
    channel.release(5);
    assert_eq!(channel.tracked_groups(), 0);

    channel.waiter(6);
    channel.resolve(6, payload("drained"));
    assert_eq!(channel.tracked_groups(), 0);
}
