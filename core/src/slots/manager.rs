use clanboard_types::SlotId;

use super::snapshot::BackupSnapshot;
use crate::board::BossBoard;
use crate::error::EngineError;
use crate::game_data::BossCatalog;
use crate::group::GroupRecord;
use crate::storage::{BackupRecord, WriteOp};

/// First slot id missing from an ascending list, else the next id after it
pub fn first_unused_slot(used: &[SlotId]) -> SlotId {
    used.iter()
        .enumerate()
        .find(|&(i, &id)| id != i as SlotId)
        .map(|(i, _)| i as SlotId)
        .unwrap_or(used.len() as SlotId)
}

/// Stage-1 board with no sessions or subscriptions
pub fn reset(record: &mut GroupRecord, catalog: &dyn BossCatalog) {
    record.board = BossBoard::fresh(record.server(), catalog);
    record.sessions.clear();
    record.subscriptions.clear();
}

/// Write op that backs up the current slot
pub fn backup_op(record: &GroupRecord) -> Result<WriteOp, EngineError> {
    Ok(WriteOp::PutBackup(BackupSnapshot::capture(record).to_record()?))
}

/// Move `record` to `target`, restoring its backup when one exists.
///
/// Returns the backup write for the slot being left.
pub fn switch(
    record: &mut GroupRecord,
    target: SlotId,
    stored: Option<&BackupRecord>,
    catalog: &dyn BossCatalog,
) -> Result<WriteOp, EngineError> {
    let backup = backup_op(record)?;
    match stored {
        Some(stored) => {
            let snapshot = BackupSnapshot::from_record(stored)?;
            snapshot.restore_into(record);
            record.data_slot = target;
        }
        None => {
            reset(record, catalog);
            record.data_slot = target;
        }
    }
    Ok(backup)
}
