use clanboard_types::{BossSlot, GroupId, MemberId};

use super::{ClanBattleEngine, SubscribeOutcome, SubscribeTarget};
use crate::error::EngineError;

impl ClanBattleEngine {
    /// Subscribe to a boss, or list the subscription table
    pub async fn subscribe(
        &self,
        group: GroupId,
        member: MemberId,
        target: SubscribeTarget,
        note: Option<String>,
    ) -> Result<SubscribeOutcome, EngineError> {
        let boss = match target {
            SubscribeTarget::Table => {
                return self
                    .read(group, |record| record.subscriptions.table().map(SubscribeOutcome::Table))
                    .await;
            }
            SubscribeTarget::Boss(boss) => boss,
        };

        self.mutate(group, |txn| {
            txn.member(member)?;
            txn.record.subscriptions.subscribe(boss, member, note.unwrap_or_default())?;
            let message = format!("{} subscribed to boss {boss}", txn.name(member));
            txn.changed(message);
            Ok(())
        })
        .await?;
        tracing::info!(group, member, boss = %boss, "subscribed");
        Ok(SubscribeOutcome::Subscribed(boss))
    }

    /// Drop subscriptions on a boss.
    ///
    /// With `member` set, drops only that entry; otherwise clears the boss.
    /// Touching anyone else's subscription needs owner or admin rights.
    pub async fn subscribe_cancel(
        &self,
        group: GroupId,
        caller: MemberId,
        boss: BossSlot,
        member: Option<MemberId>,
    ) -> Result<usize, EngineError> {
        let (removed, _) = self
            .mutate(group, |txn| {
                if member != Some(caller) {
                    txn.privileged(caller)?;
                }
                let removed = txn.record.subscriptions.cancel(boss, member)?;
                let message = match member {
                    Some(member) => format!("{} unsubscribed from boss {boss}", txn.name(member)),
                    None => format!("subscriptions on boss {boss} cleared"),
                };
                txn.changed(message);
                Ok(removed)
            })
            .await?;
        Ok(removed)
    }
}
