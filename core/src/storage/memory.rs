use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use clanboard_types::{GroupId, MemberId, SlotId};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{BackupRecord, CommitReceipt, Store, StoreError, WriteOp};
use crate::group::{GroupRecord, Member};
use crate::ledger::{ChallengeFilter, ChallengeRecord};

/// Complete store contents. Also the on-disk document of [`FileStore`](super::FileStore).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryState {
    #[serde(default)]
    groups: HashMap<GroupId, GroupRecord>,
    #[serde(default)]
    members: HashMap<GroupId, BTreeMap<MemberId, Member>>,
    /// Ledger per group, ascending by sequence
    #[serde(default)]
    ledger: HashMap<GroupId, Vec<ChallengeRecord>>,
    /// Next sequence number per group; never reused after deletes
    #[serde(default)]
    next_seq: HashMap<GroupId, u64>,
    #[serde(default)]
    backups: BTreeMap<GroupId, BTreeMap<SlotId, BackupRecord>>,
}

impl MemoryState {
    pub fn group(&self, group: GroupId) -> Option<&GroupRecord> {
        self.groups.get(&group)
    }

    pub fn member(&self, group: GroupId, member: MemberId) -> Option<&Member> {
        self.members.get(&group)?.get(&member)
    }

    pub fn members(&self, group: GroupId) -> Vec<Member> {
        self.members
            .get(&group)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn backup(&self, group: GroupId, slot: SlotId) -> Option<&BackupRecord> {
        self.backups.get(&group)?.get(&slot)
    }

    pub fn challenges(&self, filter: &ChallengeFilter) -> Vec<ChallengeRecord> {
        self.ledger
            .get(&filter.group)
            .map(|records| records.iter().filter(|r| filter.matches(&r.entry)).cloned().collect())
            .unwrap_or_default()
    }

    pub fn latest_challenge(&self, group: GroupId, slot: SlotId) -> Option<ChallengeRecord> {
        self.ledger
            .get(&group)?
            .iter()
            .rev()
            .find(|r| r.data_slot == slot)
            .cloned()
    }

    pub fn record_counts(&self, group: GroupId) -> Vec<(SlotId, usize)> {
        let mut counts: BTreeMap<SlotId, usize> = BTreeMap::new();
        for record in self.ledger.get(&group).into_iter().flatten() {
            *counts.entry(record.data_slot).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Apply a batch in order
    pub fn apply(&mut self, ops: Vec<WriteOp>) -> CommitReceipt {
        let mut receipt = CommitReceipt::default();
        for op in ops {
            match op {
                WriteOp::PutGroup(group) => {
                    self.groups.insert(group.id, *group);
                }
                WriteOp::PutMember(member) => {
                    self.members.entry(member.group).or_default().insert(member.id, member);
                }
                WriteOp::DeleteMember { group, member } => {
                    if let Some(roster) = self.members.get_mut(&group) {
                        roster.remove(&member);
                    }
                }
                WriteOp::AppendChallenge(entry) => {
                    let next = self.next_seq.entry(entry.group).or_insert(1);
                    let seq = *next;
                    *next += 1;
                    self.ledger.entry(entry.group).or_default().push(entry.with_seq(seq));
                    receipt.appended.push(seq);
                }
                WriteOp::DeleteChallenge { group, seq } => {
                    if let Some(records) = self.ledger.get_mut(&group) {
                        records.retain(|r| r.seq != seq);
                    }
                }
                WriteOp::PurgeSlot { group, slot } => {
                    if let Some(records) = self.ledger.get_mut(&group) {
                        records.retain(|r| r.data_slot != slot);
                    }
                }
                WriteOp::PutBackup(backup) => {
                    self.backups.entry(backup.group).or_default().insert(backup.slot, backup);
                }
            }
        }
        receipt
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MemoryState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }
}

impl Store for MemoryStore {
    fn group(&self, group: GroupId) -> Result<Option<GroupRecord>, StoreError> {
        Ok(self.read()?.group(group).cloned())
    }

    fn member(&self, group: GroupId, member: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.read()?.member(group, member).cloned())
    }

    fn members(&self, group: GroupId) -> Result<Vec<Member>, StoreError> {
        Ok(self.read()?.members(group))
    }

    fn backup(&self, group: GroupId, slot: SlotId) -> Result<Option<BackupRecord>, StoreError> {
        Ok(self.read()?.backup(group, slot).cloned())
    }

    fn challenges(&self, filter: &ChallengeFilter) -> Result<Vec<ChallengeRecord>, StoreError> {
        Ok(self.read()?.challenges(filter))
    }

    fn latest_challenge(&self, group: GroupId, slot: SlotId) -> Result<Option<ChallengeRecord>, StoreError> {
        Ok(self.read()?.latest_challenge(group, slot))
    }

    fn record_counts(&self, group: GroupId) -> Result<Vec<(SlotId, usize)>, StoreError> {
        Ok(self.read()?.record_counts(group))
    }

    fn commit(&self, ops: Vec<WriteOp>) -> Result<CommitReceipt, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.apply(ops))
    }
}
