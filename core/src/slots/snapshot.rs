use clanboard_types::{GroupId, SlotId};
use serde::{Deserialize, Serialize};

use crate::board::BossBoard;
use crate::error::EngineError;
use crate::group::{GroupMeta, GroupRecord};
use crate::session::SessionTable;
use crate::storage::BackupRecord;
use crate::subscription::SubscriptionBoard;

/// Schema version written into every backup
pub const SNAPSHOT_VERSION: u32 = 1;

/// Board, sessions, subscriptions and settings of one data slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub version: u32,
    pub group: GroupId,
    pub slot: SlotId,
    pub meta: GroupMeta,
    pub board: BossBoard,
    pub sessions: SessionTable,
    pub subscriptions: SubscriptionBoard,
}

impl BackupSnapshot {
    pub fn capture(record: &GroupRecord) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            group: record.id,
            slot: record.data_slot,
            meta: record.meta.clone(),
            board: record.board.clone(),
            sessions: record.sessions.clone(),
            subscriptions: record.subscriptions.clone(),
        }
    }

    pub fn to_record(&self) -> Result<BackupRecord, EngineError> {
        let blob = serde_json::to_string(self)
            .map_err(|e| EngineError::invalid(format!("cannot encode backup: {e}")))?;
        Ok(BackupRecord {
            group: self.group,
            slot: self.slot,
            blob,
        })
    }

    pub fn from_record(record: &BackupRecord) -> Result<Self, EngineError> {
        #[derive(Deserialize)]
        struct Header {
            version: u32,
        }

        let header: Header = serde_json::from_str(&record.blob)
            .map_err(|e| EngineError::invalid(format!("backup of slot {} is unreadable: {e}", record.slot)))?;
        if header.version != SNAPSHOT_VERSION {
            return Err(EngineError::invalid(format!(
                "backup of slot {} has schema version {}, expected {SNAPSHOT_VERSION}",
                record.slot, header.version
            )));
        }
        serde_json::from_str(&record.blob)
            .map_err(|e| EngineError::invalid(format!("backup of slot {} is unreadable: {e}", record.slot)))
    }

    /// Overwrite the slot state of `record` with this snapshot
    pub fn restore_into(self, record: &mut GroupRecord) {
        let deleted = record.meta.deleted;
        record.meta = GroupMeta { deleted, ..self.meta };
        record.data_slot = self.slot;
        record.board = self.board;
        record.sessions = self.sessions;
        record.subscriptions = self.subscriptions;
    }
}
