//! Per-group change notification for long-poll observers.
//!
//! Each group holds one pending [`ChangeSlot`]. A [`ChangeWaiter`] takes a
//! handle to the current slot the moment it is created; `resolve` fills that
//! slot and installs a fresh one. A waiter therefore yields exactly the first
//! change resolved after it registered, however many follow, so a caller can
//! register, trigger a mutation, and only then await. Resolutions with no
//! waiters are dropped.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use clanboard_types::{ChangePayload, GroupId};
use hashbrown::HashMap;
use tokio::sync::Notify;

#[cfg(test)]
mod channel_tests;

/// What a waiter observed
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    Changed(Arc<ChangePayload>),
    /// Timed out with no change
    Unchanged,
}

/// One generation of a group's channel; filled at most once
#[derive(Debug, Default)]
struct ChangeSlot {
    payload: OnceLock<Arc<ChangePayload>>,
    filled: Notify,
}

#[derive(Debug, Default)]
pub struct ChangeChannel {
    slots: Mutex<HashMap<GroupId, Arc<ChangeSlot>>>,
}

impl ChangeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for the next change of `group`
    pub fn waiter(&self, group: GroupId) -> ChangeWaiter {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(group).or_default().clone();
        ChangeWaiter { group, slot }
    }

    /// Deliver a change to every registered waiter. Returns how many were registered.
    ///
    /// The group's entry is removed afterwards; the next waiter starts a new slot.
    pub fn resolve(&self, group: GroupId, payload: ChangePayload) -> usize {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.remove(&group) {
                Some(slot) => slot,
                None => return 0,
            }
        };
        let delivered = Arc::strong_count(&slot) - 1;
        if slot.payload.set(Arc::new(payload)).is_ok() {
            slot.filled.notify_waiters();
        }
        tracing::debug!(group, delivered, "resolved change channel");
        delivered
    }

    /// Waiters currently registered for a group
    pub fn waiting(&self, group: GroupId) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(&group).map_or(0, |slot| Arc::strong_count(slot) - 1)
    }

    /// Groups with at least one slot pending
    pub fn tracked_groups(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drop a group's slot if nobody is waiting on it
    pub fn release(&self, group: GroupId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(&group).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&group);
        }
    }
}

/// A single registration; consumed by [`wait`](Self::wait)
#[derive(Debug)]
pub struct ChangeWaiter {
    group: GroupId,
    slot: Arc<ChangeSlot>,
}

impl ChangeWaiter {
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Suspend until the next change or the timeout
    pub async fn wait(self, timeout: Duration) -> WaitOutcome {
        let slot = &self.slot;
        let next = async {
            loop {
                // Armed before the check so a fill in between is not missed
                let filled = slot.filled.notified();
                if let Some(payload) = slot.payload.get() {
                    return payload.clone();
                }
                filled.await;
            }
        };
        match tokio::time::timeout(timeout, next).await {
            Ok(payload) => WaitOutcome::Changed(payload),
            Err(_) => {
                tracing::debug!(group = self.group, "long poll finished without a change");
                WaitOutcome::Unchanged
            }
        }
    }
}
