//! Group lifecycle, roster and settings

use clanboard_types::{BossSlot, EchoFlags, GroupId, MemberId, Server};

use super::{ClanBattleEngine, SaveLoadAction, SaveLoadOutcome, Txn};
use crate::board::{BoardEdit, BossBoard};
use crate::error::EngineError;
use crate::game_data::{GameCalendar, GameDate};
use crate::group::{GroupMeta, GroupRecord, Member, Role};
use crate::notify::Notice;
use crate::session::SessionTable;
use crate::storage::WriteOp;
use crate::subscription::SubscriptionBoard;

impl ClanBattleEngine {
    /// Create a clan for a group, or revive a deleted one.
    ///
    /// A revived group keeps its board and data slot; only the server and
    /// name are replaced.
    pub async fn create_group(&self, group: GroupId, server: Server, name: Option<String>) -> Result<(), EngineError> {
        let mut guard = self.lock(group).await?;
        let record = match &*guard {
            Some(existing) if !existing.meta.deleted => {
                return Err(EngineError::Conflict(format!("group {group} already has a clan")));
            }
            Some(existing) => {
                let mut revived = existing.clone();
                revived.meta.deleted = false;
                revived.meta.server = server;
                if name.is_some() {
                    revived.meta.name = name;
                }
                revived
            }
            None => GroupRecord {
                id: group,
                meta: GroupMeta::new(server, name),
                data_slot: 0,
                board: BossBoard::fresh(server, self.catalog.as_ref()),
                sessions: SessionTable::default(),
                subscriptions: SubscriptionBoard::default(),
            },
        };

        let mut txn = Txn::new(self, record);
        txn.changed(format!("clan created on the {server} server"));
        self.finish(&mut guard, txn)?;
        tracing::info!(group, %server, "clan created");
        Ok(())
    }

    /// Mark a group deleted. Its data stays so it can be revived.
    pub async fn delete_group(&self, group: GroupId, caller: MemberId) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            txn.record.meta.deleted = true;
            txn.record.sessions.clear();
            txn.changed("clan deleted");
            Ok(())
        })
        .await?;
        tracing::info!(group, caller, "clan deleted");
        Ok(())
    }

    /// Bind a member to the group, or refresh their nickname and role
    pub async fn join(
        &self,
        group: GroupId,
        member: MemberId,
        nickname: Option<String>,
        role: Role,
    ) -> Result<Member, EngineError> {
        let (joined, _) = self
            .mutate(group, |txn| {
                let joined = match txn.store().member(txn.group(), member)? {
                    Some(mut existing) => {
                        if nickname.is_some() {
                            existing.nickname = nickname;
                        }
                        existing.role = role;
                        existing
                    }
                    None => Member::new(txn.group(), member, nickname, role),
                };
                txn.write(WriteOp::PutMember(joined.clone()));
                txn.changed(format!("{} joined the clan", joined.display_name()));
                Ok(joined)
            })
            .await?;
        tracing::info!(group, member, role = ?joined.role, "member joined");
        Ok(joined)
    }

    /// Remove members along with their sessions and subscriptions.
    ///
    /// Ids that are not members are skipped. Returns how many were removed.
    pub async fn drop_members(&self, group: GroupId, caller: MemberId, members: &[MemberId]) -> Result<usize, EngineError> {
        let (removed, _) = self
            .mutate(group, |txn| {
                txn.privileged(caller)?;
                let mut removed = 0;
                for &member in members {
                    if txn.store().member(txn.group(), member)?.is_none() {
                        continue;
                    }
                    txn.record.sessions.remove(member);
                    for boss in BossSlot::all() {
                        if txn.record.subscriptions.is_subscribed(boss, member) {
                            txn.record.subscriptions.cancel(boss, Some(member))?;
                        }
                    }
                    txn.write(WriteOp::DeleteMember {
                        group: txn.group(),
                        member,
                    });
                    removed += 1;
                }
                txn.changed(format!("{removed} member(s) removed"));
                Ok(removed)
            })
            .await?;
        tracing::info!(group, caller, removed, "members dropped");
        Ok(removed)
    }

    pub async fn set_server(&self, group: GroupId, caller: MemberId, server: Server) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            txn.record.meta.server = server;
            txn.changed(format!("server set to {server}"));
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub async fn set_echo_flags(&self, group: GroupId, caller: MemberId, flags: EchoFlags) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            txn.record.meta.echo = flags;
            txn.changed("echo settings updated");
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Damage at which a tail-kill or compensation attempt scores a full point
    pub async fn set_threshold(&self, group: GroupId, caller: MemberId, threshold: u64) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            txn.record.meta.threshold = threshold;
            txn.changed(format!("score threshold set to {threshold}"));
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Manual board correction
    pub async fn modify_board(
        &self,
        group: GroupId,
        caller: MemberId,
        cycle: Option<u32>,
        edits: &[(BossSlot, BoardEdit)],
    ) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.privileged(caller)?;
            let (server, catalog) = (txn.server(), txn.catalog());
            txn.record.board.modify(cycle, edits, server, catalog)?;
            let message = format!("board corrected by {}", txn.name(caller));
            txn.changed(message);
            Ok(())
        })
        .await?;
        tracing::info!(group, caller, "board modified");
        Ok(())
    }

    /// Save-load ("SL") bookkeeping, limited to once per game day
    pub async fn save_load(
        &self,
        group: GroupId,
        member: MemberId,
        action: SaveLoadAction,
    ) -> Result<SaveLoadOutcome, EngineError> {
        let record_today = match action {
            SaveLoadAction::Check => {
                return self
                    .read(group, |record| {
                        let today = self.calendar.today(record.server());
                        let marked = self.require_member(group, member)?.last_save_slot == today;
                        Ok(SaveLoadOutcome::Marked(marked))
                    })
                    .await;
            }
            SaveLoadAction::Record => true,
            SaveLoadAction::Cancel => false,
        };

        let (outcome, _) = self
            .mutate(group, |txn| {
                let mut record = txn.member(member)?;
                let today = txn.now().date;
                let outcome = if record_today {
                    if record.last_save_slot == today {
                        return Err(EngineError::Conflict("save-load already used today".into()));
                    }
                    record.last_save_slot = today;
                    txn.record.sessions.remove(member);
                    SaveLoadOutcome::Recorded
                } else {
                    if record.last_save_slot != today {
                        return Err(EngineError::not_found("no save-load recorded today"));
                    }
                    record.last_save_slot = GameDate(0);
                    SaveLoadOutcome::Cancelled
                };
                let message = match outcome {
                    SaveLoadOutcome::Recorded => format!("{} used save-load", txn.name(member)),
                    _ => format!("{} cancelled their save-load", txn.name(member)),
                };
                txn.write(WriteOp::PutMember(record));
                txn.changed(message);
                Ok(outcome)
            })
            .await?;
        Ok(outcome)
    }

    /// Ask members to finish today's attempts. Returns how many notices went out.
    pub async fn remind(
        &self,
        group: GroupId,
        sender: MemberId,
        members: &[MemberId],
        private: bool,
    ) -> Result<usize, EngineError> {
        if members.is_empty() {
            return Err(EngineError::invalid("nobody to remind"));
        }
        self.read(group, |_| Ok(())).await?;
        self.require_member(group, sender)?;

        let text = format!("{} reminds you to finish today's attempts", self.display_name(group, sender));
        let notices: Vec<Notice> = if private {
            members.iter().map(|&m| Notice::private(m, text.clone())).collect()
        } else {
            vec![Notice::group(group, members.to_vec(), text)]
        };
        self.push_notices(&notices);
        tracing::info!(group, sender, count = members.len(), private, "reminder sent");
        Ok(members.len())
    }
}
