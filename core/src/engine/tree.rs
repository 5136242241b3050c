//! Tree ("hanging") state of active sessions

use clanboard_types::{BossSlot, GroupId, MemberId, SessionView};

use super::ClanBattleEngine;
use crate::error::EngineError;

impl ClanBattleEngine {
    /// Put a member's session on the tree, applying first when they have none.
    ///
    /// A member with no full attempts left is applied as compensation instead.
    pub async fn enter_tree(
        &self,
        group: GroupId,
        caller: MemberId,
        boss: Option<BossSlot>,
        note: Option<String>,
        on_behalf_of: Option<MemberId>,
    ) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            let member = on_behalf_of.unwrap_or(caller);
            let proxy = on_behalf_of.map(|_| caller).filter(|&p| p != member);
            txn.member(member)?;

            match (txn.record.sessions.get(member).map(|s| s.boss), boss) {
                (Some(current), Some(given)) if current != given => {
                    return Err(EngineError::invalid(format!(
                        "challenging boss {current}, not boss {given}"
                    )));
                }
                (Some(_), _) => {}
                (None, None) => {
                    return Err(EngineError::invalid("no active challenge and no boss given"));
                }
                (None, Some(given)) => match txn.open_session(member, given, false, proxy) {
                    Err(EngineError::QuotaExceeded(_)) => {
                        txn.open_session(member, given, true, proxy).map_err(|err| match err {
                            EngineError::QuotaExceeded(_) => {
                                EngineError::QuotaExceeded("all attempts for today are used".into())
                            }
                            other => other,
                        })?;
                    }
                    other => {
                        other?;
                    }
                },
            }

            let note = match (proxy, note) {
                (Some(proxy), note) => Some(format!(
                    "[on behalf of {}] {}",
                    txn.name(proxy),
                    note.unwrap_or_default()
                )),
                (None, note) => note,
            };
            txn.record.sessions.enter_tree(member, note)?;

            let boss = txn.record.sessions.get(member).map(|s| s.boss);
            let mut message = format!("{} is on the tree", txn.name(member));
            if let Some(boss) = boss {
                message.push_str(&format!(" at boss {boss}"));
            }
            txn.changed(message);
            Ok(())
        })
        .await?;
        tracing::info!(group, member = on_behalf_of.unwrap_or(caller), "entered tree");
        Ok(())
    }

    pub async fn exit_tree(&self, group: GroupId, member: MemberId) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.record.sessions.exit_tree(member)?;
            let message = format!("{} came off the tree", txn.name(member));
            txn.changed(message);
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Members on the tree, optionally only those on one boss
    pub async fn tree(&self, group: GroupId, boss: Option<BossSlot>) -> Result<Vec<SessionView>, EngineError> {
        self.read(group, |record| Ok(record.sessions.tree(boss).map(|s| s.view()).collect()))
            .await
    }
}
