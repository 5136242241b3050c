//! Apply, report, resolve, cancel and undo

use clanboard_types::{BossSlot, GroupId, MemberId, format_thousands};

use super::{ApplyOutcome, CancelScope, ClanBattleEngine, ReportClearOutcome, ResolveOutcome, ResolveRequest, UndoOutcome};
use crate::board::UndoEffect;
use crate::error::EngineError;
use crate::ledger::{AttemptKind, ChallengeFilter, NewChallenge};
use crate::notify::Notice;
use crate::storage::WriteOp;

impl ClanBattleEngine {
    /// Start a challenge on a boss, optionally reported by `caller` for another member
    pub async fn apply(
        &self,
        group: GroupId,
        caller: MemberId,
        boss: BossSlot,
        is_continue: bool,
        on_behalf_of: Option<MemberId>,
    ) -> Result<ApplyOutcome, EngineError> {
        let (outcome, _) = self
            .mutate(group, |txn| {
                let member = on_behalf_of.unwrap_or(caller);
                let proxy = on_behalf_of.map(|_| caller);
                txn.member(member)?;
                let admission = txn.open_session(member, boss, is_continue, proxy)?;
                let mut message = format!("{} started a challenge on boss {boss}", txn.name(member));
                if admission.is_continue() {
                    message.push_str(" (compensation)");
                }
                txn.changed(message);
                Ok(ApplyOutcome {
                    member,
                    boss,
                    admission,
                })
            })
            .await?;
        tracing::info!(group, member = outcome.member, boss = %boss, "applied");
        Ok(outcome)
    }

    /// Drop sessions. Returns how many were removed.
    pub async fn cancel(&self, group: GroupId, caller: MemberId, scope: CancelScope) -> Result<usize, EngineError> {
        let (removed, _) = self
            .mutate(group, |txn| {
                let removed = match scope {
                    CancelScope::Own => {
                        txn.record
                            .sessions
                            .remove(caller)
                            .ok_or_else(|| EngineError::not_found("no active challenge session"))?;
                        1
                    }
                    CancelScope::Boss(boss) => txn.record.sessions.remove_boss(boss).len(),
                    CancelScope::All => txn.record.sessions.clear(),
                };
                let message = match scope {
                    CancelScope::Own => format!("{} cancelled their challenge", txn.name(caller)),
                    CancelScope::Boss(boss) => format!("challenges on boss {boss} cancelled"),
                    CancelScope::All => "all challenges cancelled".to_string(),
                };
                txn.changed(message);
                Ok(removed)
            })
            .await?;
        Ok(removed)
    }

    /// Record paused-battle progress (seconds left, damage so far)
    pub async fn report(&self, group: GroupId, member: MemberId, seconds: u32, damage: u64) -> Result<(), EngineError> {
        self.mutate(group, |txn| {
            txn.record.sessions.report(member, seconds, damage)?;
            let message = format!(
                "{} paused at {seconds}s with {} damage",
                txn.name(member),
                format_thousands(damage)
            );
            txn.changed(message);
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub async fn report_clear(&self, group: GroupId, member: MemberId) -> Result<ReportClearOutcome, EngineError> {
        let (outcome, _) = self
            .mutate(group, |txn| {
                if !txn.record.sessions.report_clear(member)? {
                    return Ok(ReportClearOutcome::NothingToClear);
                }
                let message = format!("{} cleared their paused report", txn.name(member));
                txn.changed(message);
                Ok(ReportClearOutcome::Cleared)
            })
            .await?;
        Ok(outcome)
    }

    /// Record a finished attempt and advance the board.
    pub async fn resolve(&self, group: GroupId, request: ResolveRequest) -> Result<ResolveOutcome, EngineError> {
        let damage = match (request.defeat, request.damage) {
            (true, _) => 0,
            (false, None) => return Err(EngineError::invalid("damage is required unless the boss was defeated")),
            (false, Some(d)) if d < 0 => return Err(EngineError::invalid("damage cannot be negative")),
            (false, Some(d)) => d as u64,
        };

        let (mut outcome, receipt) = self
            .mutate(group, |txn| {
                let (server, catalog) = (txn.server(), txn.catalog());
                let member = request.on_behalf_of.unwrap_or(request.caller);
                let proxy = request.on_behalf_of.map(|_| request.caller).filter(|&p| p != member);
                txn.member(member)?;

                // Settle which boss this attempt was on
                let boss = match (txn.record.sessions.get(member).map(|s| s.boss), request.boss) {
                    (Some(current), Some(given)) if current != given => {
                        txn.record.sessions.retarget(member, given)?;
                        given
                    }
                    (Some(current), _) => current,
                    (None, Some(given)) => {
                        txn.open_session(member, given, request.is_continue, proxy)?;
                        given
                    }
                    (None, None) => {
                        return Err(EngineError::invalid(
                            "no active challenge and no boss given",
                        ));
                    }
                };

                let target = txn.record.board.attack_target(boss, server, catalog)?;
                if !request.defeat && damage >= target.health {
                    return Err(EngineError::invalid(format!(
                        "{} damage reaches the remaining {} health; report a defeat instead",
                        format_thousands(damage),
                        format_thousands(target.health)
                    )));
                }

                let mut clock = txn.now();
                if request.previous_day {
                    let today = ChallengeFilter::group(txn.group())
                        .slot(txn.record.data_slot)
                        .date(clock.date);
                    if !txn.store().challenges(&today)?.is_empty() {
                        return Err(EngineError::invalid(
                            "today already has records; cannot back-fill yesterday",
                        ));
                    }
                    clock = clock.back_filled();
                }

                let session_continue = txn.record.sessions.get(member).is_some_and(|s| s.is_continue);
                let mut status = txn.quota(member, clock.date)?;
                let admission = status.admit(request.is_continue || session_continue, txn.engine.policy)?;
                let is_continue = admission.is_continue();

                let (health_remain, credited) = if request.defeat {
                    let hit = txn.record.board.defeat(boss)?;
                    (0, hit.health)
                } else {
                    let hit = txn.record.board.apply_damage(boss, damage)?;
                    (hit.health, damage)
                };

                let entry = NewChallenge {
                    group: txn.group(),
                    data_slot: txn.record.data_slot,
                    member,
                    proxy,
                    date: clock.date,
                    seconds: clock.seconds,
                    cycle: target.cycle,
                    boss,
                    health_remain,
                    damage: credited,
                    is_continue,
                    message: request.message.clone(),
                };
                txn.write(WriteOp::AppendChallenge(entry.clone()));
                status.push(health_remain, is_continue);

                let mut rolled_over_to = None;
                if request.defeat {
                    if let Some(rollover) = txn.record.board.roll_over_if_cleared(server, catalog) {
                        rolled_over_to = Some(rollover.new_cycle);
                        for slot in rollover.cleared_on_arrival {
                            txn.remind_subscribers(slot);
                        }
                    }
                    // The instance is dead; everyone on it is done
                    let ended = txn.record.sessions.remove_boss(boss);
                    let on_tree: Vec<MemberId> = ended
                        .iter()
                        .filter(|s| s.on_tree && s.member != member)
                        .map(|s| s.member)
                        .collect();
                    if !on_tree.is_empty() {
                        let notice = Notice::group(
                            txn.group(),
                            on_tree,
                            format!("Boss {boss} is down, you can come off the tree"),
                        );
                        txn.notify(notice);
                    }
                    if txn.record.board.is_reachable(boss, server, catalog) {
                        txn.remind_subscribers(boss);
                    }
                } else {
                    txn.record.sessions.remove(member);
                }

                let kind = AttemptKind::of(health_remain, is_continue);
                let mut message = txn.name(member);
                if let Some(proxy) = proxy {
                    message.push_str(&format!(" (reported by {})", txn.name(proxy)));
                }
                message.push_str(&format!(" dealt {} damage to boss {boss}", format_thousands(credited)));
                if request.defeat {
                    message.push_str(" and defeated it");
                }
                message.push_str(&format!(
                    " ({}; {} full attempts today, {} compensation left)",
                    kind.label(),
                    status.finished,
                    status.credit
                ));
                if let Some(cycle) = rolled_over_to {
                    message.push_str(&format!("\nCycle {cycle} begins"));
                }
                txn.changed(message.clone());

                Ok(ResolveOutcome {
                    record: entry.with_seq(0),
                    kind,
                    finished_today: status.finished,
                    credit_left: status.credit,
                    rolled_over_to,
                    message,
                })
            })
            .await?;

        if let Some(&seq) = receipt.appended.first() {
            outcome.record.seq = seq;
        }
        tracing::info!(
            group,
            member = outcome.record.member,
            boss = %outcome.record.boss,
            seq = outcome.record.seq,
            kind = ?outcome.kind,
            "attempt recorded"
        );
        Ok(outcome)
    }

    /// Delete the latest record of the current slot and reverse its board effect
    pub async fn undo(&self, group: GroupId, caller: MemberId) -> Result<UndoOutcome, EngineError> {
        let (outcome, _) = self
            .mutate(group, |txn| {
                let record = txn
                    .store()
                    .latest_challenge(txn.group(), txn.record.data_slot)?
                    .ok_or_else(|| EngineError::not_found("no attempts recorded in this data slot"))?;
                if !record.is_owned_by(caller) && !txn.member(caller)?.is_privileged() {
                    return Err(EngineError::Unauthorized(
                        "only the attacker, their proxy, or an admin can undo this attempt".into(),
                    ));
                }

                let (server, catalog) = (txn.server(), txn.catalog());
                let effect = txn
                    .record
                    .board
                    .undo(record.boss, record.cycle, record.damage, server, catalog);
                txn.write(WriteOp::DeleteChallenge {
                    group: txn.group(),
                    seq: record.seq,
                });

                let mut message = format!("{}'s attempt on boss {} was undone", txn.name(record.member), record.boss);
                if let UndoEffect::RolledBack { cycle } = effect {
                    message.push_str(&format!(", back to cycle {cycle}"));
                }
                txn.changed(message.clone());
                Ok(UndoOutcome { record, effect, message })
            })
            .await?;
        tracing::info!(group, seq = outcome.record.seq, effect = ?outcome.effect, "attempt undone");
        Ok(outcome)
    }
}
