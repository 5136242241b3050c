//! Data slot switching, clearing and backup

use clanboard_types::{GroupId, MemberId, SlotId};

use super::ClanBattleEngine;
use crate::error::EngineError;
use crate::ledger::ChallengeFilter;
use crate::slots;
use crate::storage::WriteOp;

impl ClanBattleEngine {
    /// Back up the live slot and move to `target`
    pub async fn switch_data_slot(&self, group: GroupId, caller: MemberId, target: SlotId) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            let from = txn.record.data_slot;
            if from == target {
                return Err(EngineError::invalid(format!("already on data slot {target}")));
            }
            let stored = txn.store().backup(txn.group(), target)?;
            let restored = stored.is_some();
            let catalog = txn.catalog();
            let backup = slots::switch(&mut txn.record, target, stored.as_ref(), catalog)?;
            txn.write(backup);
            txn.changed(if restored {
                format!("switched from data slot {from} to {target}")
            } else {
                format!("switched from data slot {from} to new slot {target}")
            });
            Ok(())
        })
        .await?;
        tracing::info!(group, caller, target, "data slot switched");
        Ok(())
    }

    /// Reset the live board and delete every record of a slot.
    ///
    /// `slot` defaults to the live one. Returns how many records were deleted.
    pub async fn clear_data_slot(
        &self,
        group: GroupId,
        caller: MemberId,
        slot: Option<SlotId>,
    ) -> Result<usize, EngineError> {
        let (purged, _) = self
            .mutate(group, |txn| {
                txn.privileged(caller)?;
                let slot = slot.unwrap_or(txn.record.data_slot);
                let purged = txn
                    .store()
                    .challenges(&ChallengeFilter::group(txn.group()).slot(slot))?
                    .len();
                let catalog = txn.catalog();
                slots::reset(&mut txn.record, catalog);
                txn.write(WriteOp::PurgeSlot {
                    group: txn.group(),
                    slot,
                });
                txn.changed(format!("data slot {slot} cleared"));
                Ok(purged)
            })
            .await?;
        tracing::info!(group, caller, purged, "data slot cleared");
        Ok(purged)
    }

    /// Snapshot the live slot without switching
    pub async fn backup(&self, group: GroupId, caller: MemberId) -> Result<SlotId, EngineError> {
        let (slot, _) = self
            .mutate(group, |txn| {
                txn.privileged(caller)?;
                let op = slots::backup_op(&txn.record)?;
                txn.write(op);
                let slot = txn.record.data_slot;
                txn.changed(format!("data slot {slot} backed up"));
                Ok(slot)
            })
            .await?;
        tracing::info!(group, caller, slot, "data slot backed up");
        Ok(slot)
    }

    /// Lowest slot id the ledger has no records for
    pub async fn first_unused_slot(&self, group: GroupId) -> Result<SlotId, EngineError> {
        self.read(group, |_| Ok(slots::first_unused_slot(&self.store.slot_ids(group)?)))
            .await
    }
}
