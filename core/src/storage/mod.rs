//! Persistence contract for groups, members, the challenge ledger and backups.
//!
//! Reads are plain lookups and ordered scans. Every write that belongs to one
//! engine operation goes through a single [`Store::commit`] batch, which must
//! apply completely or not at all.

mod error;
mod file;
mod memory;

#[cfg(test)]
mod storage_tests;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::{MemoryState, MemoryStore};

use clanboard_types::{GroupId, MemberId, SlotId};
use serde::{Deserialize, Serialize};

use crate::group::{GroupRecord, Member};
use crate::ledger::{ChallengeFilter, ChallengeRecord, NewChallenge};

/// Serialized snapshot of one data slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub group: GroupId,
    pub slot: SlotId,
    /// JSON-encoded [`BackupSnapshot`](crate::slots::BackupSnapshot)
    pub blob: String,
}

/// One write in a commit batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    PutGroup(Box<GroupRecord>),
    PutMember(Member),
    DeleteMember { group: GroupId, member: MemberId },
    /// Append with the next sequence number of the group
    AppendChallenge(NewChallenge),
    DeleteChallenge { group: GroupId, seq: u64 },
    /// Delete every ledger record of one data slot
    PurgeSlot { group: GroupId, slot: SlotId },
    PutBackup(BackupRecord),
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitReceipt {
    /// Sequence numbers assigned to `AppendChallenge` ops, in batch order
    pub appended: Vec<u64>,
}

pub trait Store: Send + Sync {
    fn group(&self, group: GroupId) -> Result<Option<GroupRecord>, StoreError>;

    fn member(&self, group: GroupId, member: MemberId) -> Result<Option<Member>, StoreError>;

    /// Roster ordered by member id
    fn members(&self, group: GroupId) -> Result<Vec<Member>, StoreError>;

    fn backup(&self, group: GroupId, slot: SlotId) -> Result<Option<BackupRecord>, StoreError>;

    /// Records matching the filter, ordered by sequence
    fn challenges(&self, filter: &ChallengeFilter) -> Result<Vec<ChallengeRecord>, StoreError>;

    /// Highest-sequence record of one data slot
    fn latest_challenge(&self, group: GroupId, slot: SlotId) -> Result<Option<ChallengeRecord>, StoreError> {
        Ok(self.challenges(&ChallengeFilter::group(group).slot(slot))?.pop())
    }

    /// Distinct slot ids referenced by the ledger, ascending
    fn slot_ids(&self, group: GroupId) -> Result<Vec<SlotId>, StoreError> {
        Ok(self.record_counts(group)?.into_iter().map(|(slot, _)| slot).collect())
    }

    /// Record count per slot, ascending by slot id
    fn record_counts(&self, group: GroupId) -> Result<Vec<(SlotId, usize)>, StoreError>;

    /// Apply a batch atomically
    fn commit(&self, ops: Vec<WriteOp>) -> Result<CommitReceipt, StoreError>;
}
