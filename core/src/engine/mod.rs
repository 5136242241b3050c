//! Clan battle engine
//!
//! One method per command. Every mutation runs against a working copy of the
//! group under the group's async lock:
//!
//! 1. the operation mutates the copy and queues store writes and notices
//! 2. the writes are committed as one batch
//! 3. only then is the cached group replaced, the change channel resolved,
//!    and the notices pushed
//!
//! A failure at any step before 3 leaves the cached group untouched.

mod admin;
mod challenge;
mod outcome;
mod queries;
mod slots;
mod subscriptions;
mod tree;


pub use outcome::{
    ApplyOutcome, CancelScope, ReportClearOutcome, ResolveOutcome, ResolveRequest, SaveLoadAction,
    SaveLoadOutcome, SubscribeOutcome, SubscribeTarget, UndoOutcome,
};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use clanboard_types::{BossSlot, ChangePayload, EngineConfig, GroupId, MemberId, Server};
use hashbrown::HashMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::channel::ChangeChannel;
use crate::error::EngineError;
use crate::game_data::{BossCatalog, GameCalendar, GameClock, GameDate, StaticCatalog, SystemCalendar};
use crate::group::{GroupRecord, Member};
use crate::ledger::{Admission, ChallengeFilter, QuotaStatus, UpgradePolicy};
use crate::notify::{LogNotifier, NicknameResolver, NoNicknames, Notice, Notifier};
use crate::session::ChallengeSession;
use crate::storage::{CommitReceipt, MemoryStore, Store, WriteOp};

type GroupCell = Arc<AsyncMutex<Option<GroupRecord>>>;

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

pub struct EngineBuilder {
    store: Option<Arc<dyn Store>>,
    catalog: Option<Arc<dyn BossCatalog>>,
    calendar: Option<Arc<dyn GameCalendar>>,
    notifier: Option<Arc<dyn Notifier>>,
    nicknames: Option<Arc<dyn NicknameResolver>>,
    policy: UpgradePolicy,
    long_poll: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl EngineBuilder {
    /// Policy, long-poll timeout, boss tables and calendar from config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            store: None,
            catalog: Some(Arc::new(StaticCatalog::new(&config.boss_tables))),
            calendar: Some(Arc::new(SystemCalendar::new(config.day_reset_hour))),
            notifier: None,
            nicknames: None,
            policy: UpgradePolicy::from_flag(config.auto_upgrade_compensation),
            long_poll: Duration::from_secs(config.long_poll_timeout_secs),
        }
    }

    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn BossCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn calendar(mut self, calendar: Arc<dyn GameCalendar>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn nicknames(mut self, nicknames: Arc<dyn NicknameResolver>) -> Self {
        self.nicknames = Some(nicknames);
        self
    }

    pub fn policy(mut self, policy: UpgradePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn long_poll(mut self, timeout: Duration) -> Self {
        self.long_poll = timeout;
        self
    }

    pub fn build(self) -> ClanBattleEngine {
        ClanBattleEngine {
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            catalog: self.catalog.unwrap_or_else(|| Arc::new(StaticCatalog::default())),
            calendar: self.calendar.unwrap_or_else(|| Arc::new(SystemCalendar::default())),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            nicknames: self.nicknames.unwrap_or_else(|| Arc::new(NoNicknames)),
            policy: self.policy,
            long_poll: self.long_poll,
            channel: ChangeChannel::new(),
            groups: Mutex::new(HashMap::new()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

pub struct ClanBattleEngine {
    store: Arc<dyn Store>,
    catalog: Arc<dyn BossCatalog>,
    calendar: Arc<dyn GameCalendar>,
    notifier: Arc<dyn Notifier>,
    nicknames: Arc<dyn NicknameResolver>,
    policy: UpgradePolicy,
    long_poll: Duration,
    channel: ChangeChannel,
    groups: Mutex<HashMap<GroupId, GroupCell>>,
}

impl ClanBattleEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn policy(&self) -> UpgradePolicy {
        self.policy
    }

    pub fn channel(&self) -> &ChangeChannel {
        &self.channel
    }

    fn cell(&self, group: GroupId) -> GroupCell {
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups.entry(group).or_default().clone()
    }

    /// Drop a group's cell unless someone else still holds it
    fn forget(&self, group: GroupId) {
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        if groups.get(&group).is_some_and(|cell| Arc::strong_count(cell) == 1) {
            groups.remove(&group);
        }
    }

    /// Lock a group's cell, loading it from the store on first use
    async fn lock(&self, group: GroupId) -> Result<OwnedMutexGuard<Option<GroupRecord>>, EngineError> {
        let mut guard = self.cell(group).lock_owned().await;
        if guard.is_none() {
            match self.store.group(group) {
                Ok(loaded) => *guard = loaded,
                Err(err) => {
                    drop(guard);
                    self.forget(group);
                    return Err(err.into());
                }
            }
        }
        Ok(guard)
    }

    /// Lock a group that has a stored record, deleted or not
    async fn lock_existing(&self, group: GroupId) -> Result<OwnedMutexGuard<Option<GroupRecord>>, EngineError> {
        let guard = self.lock(group).await?;
        if guard.is_none() {
            drop(guard);
            self.forget(group);
            return Err(EngineError::not_found(format!("group {group} has no clan")));
        }
        Ok(guard)
    }

    /// Cached group cells
    pub fn cached_groups(&self) -> usize {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn active(guard: &Option<GroupRecord>, group: GroupId) -> Result<&GroupRecord, EngineError> {
        match guard {
            Some(record) if !record.meta.deleted => Ok(record),
            _ => Err(EngineError::not_found(format!("group {group} has no clan"))),
        }
    }

    /// Run a read against the current group state
    async fn read<T>(
        &self,
        group: GroupId,
        f: impl FnOnce(&GroupRecord) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let guard = self.lock_existing(group).await?;
        f(Self::active(&guard, group)?)
    }

    /// Run a mutation of an existing group
    async fn mutate<T>(
        &self,
        group: GroupId,
        f: impl FnOnce(&mut Txn<'_>) -> Result<T, EngineError>,
    ) -> Result<(T, CommitReceipt), EngineError> {
        let mut guard = self.lock_existing(group).await?;
        let record = Self::active(&guard, group)?.clone();
        let mut txn = Txn::new(self, record);
        let value = f(&mut txn)?;
        let receipt = self.finish(&mut guard, txn)?;
        Ok((value, receipt))
    }

    /// Commit a transaction and publish its effects
    fn finish(&self, slot: &mut Option<GroupRecord>, txn: Txn<'_>) -> Result<CommitReceipt, EngineError> {
        let Txn {
            record,
            mut ops,
            notices,
            message,
            ..
        } = txn;
        ops.push(WriteOp::PutGroup(Box::new(record.clone())));
        let receipt = self.store.commit(ops)?;

        let group = record.id;
        let payload = message.map(|message| ChangePayload {
            board: record.board.view(record.server(), self.catalog.as_ref()),
            cycle: record.board.cycle,
            message,
        });
        *slot = Some(record);

        if let Some(payload) = payload {
            tracing::info!(group, message = %payload.message, "committed");
            self.channel.resolve(group, payload);
        }
        self.push_notices(&notices);
        Ok(receipt)
    }

    fn push_notices(&self, notices: &[Notice]) {
        for notice in notices {
            if let Err(err) = self.notifier.push(notice) {
                tracing::warn!(error = %err, target_kind = ?notice.target, "notification dropped");
            }
        }
    }

    /// Best-effort display name
    fn display_name(&self, group: GroupId, member: MemberId) -> String {
        if let Some(name) = self.nicknames.nickname(member) {
            return name;
        }
        match self.store.member(group, member) {
            Ok(Some(m)) => m.display_name(),
            Ok(None) => member.to_string(),
            Err(err) => {
                tracing::warn!(group, member, error = %err, "nickname lookup failed");
                member.to_string()
            }
        }
    }

    fn require_member(&self, group: GroupId, member: MemberId) -> Result<Member, EngineError> {
        self.store
            .member(group, member)?
            .ok_or_else(|| EngineError::not_found(format!("{member} has not joined this clan")))
    }

    fn require_privileged(&self, group: GroupId, member: MemberId) -> Result<Member, EngineError> {
        let member = self.require_member(group, member)?;
        if !member.is_privileged() {
            return Err(EngineError::Unauthorized(
                "only the clan owner or an admin can do this".into(),
            ));
        }
        Ok(member)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction
// ─────────────────────────────────────────────────────────────────────────────

/// Working copy of one group plus the effects queued against it
pub(crate) struct Txn<'a> {
    engine: &'a ClanBattleEngine,
    record: GroupRecord,
    ops: Vec<WriteOp>,
    notices: Vec<Notice>,
    message: Option<String>,
}

impl<'a> Txn<'a> {
    fn new(engine: &'a ClanBattleEngine, record: GroupRecord) -> Self {
        Self {
            engine,
            record,
            ops: Vec::new(),
            notices: Vec::new(),
            message: None,
        }
    }

    fn group(&self) -> GroupId {
        self.record.id
    }

    fn server(&self) -> Server {
        self.record.server()
    }

    fn catalog(&self) -> &'a dyn BossCatalog {
        self.engine.catalog.as_ref()
    }

    fn now(&self) -> GameClock {
        self.engine.calendar.now(self.server())
    }

    fn store(&self) -> &'a dyn Store {
        self.engine.store.as_ref()
    }

    fn member(&self, member: MemberId) -> Result<Member, EngineError> {
        self.engine.require_member(self.group(), member)
    }

    fn privileged(&self, member: MemberId) -> Result<Member, EngineError> {
        self.engine.require_privileged(self.group(), member)
    }

    fn name(&self, member: MemberId) -> String {
        self.engine.display_name(self.group(), member)
    }

    /// Message delivered to long-poll waiters on commit
    fn changed(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn write(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Today's accounting for a member in the current slot
    fn quota(&self, member: MemberId, date: GameDate) -> Result<QuotaStatus, EngineError> {
        let filter = ChallengeFilter::group(self.group())
            .slot(self.record.data_slot)
            .member(member)
            .date(date);
        Ok(QuotaStatus::tally(&self.store().challenges(&filter)?))
    }

    /// Open a session after the board and quota checks
    fn open_session(
        &mut self,
        member: MemberId,
        boss: BossSlot,
        is_continue: bool,
        proxy: Option<MemberId>,
    ) -> Result<Admission, EngineError> {
        if let Some(existing) = self.record.sessions.get(member) {
            return Err(EngineError::Conflict(format!(
                "already challenging boss {}",
                existing.boss
            )));
        }
        self.record.board.attack_target(boss, self.server(), self.catalog())?;
        let date = self.now().date;
        let admission = self.quota(member, date)?.admit(is_continue, self.engine.policy)?;
        self.record.sessions.apply(ChallengeSession::new(
            member,
            boss,
            admission.is_continue(),
            proxy,
        ))?;
        Ok(admission)
    }

    /// Fire the subscription reminder of a boss, if anyone is waiting
    fn remind_subscribers(&mut self, boss: BossSlot) {
        if let Some(reminder) = self.record.subscriptions.fire(boss) {
            let mut text = format!("A new boss {boss} has appeared");
            for (member, note) in &reminder.subscribers {
                text.push('\n');
                text.push_str(&self.name(*member));
                if !note.is_empty() {
                    text.push_str(": ");
                    text.push_str(note);
                }
            }
            let notice = Notice::group(self.group(), reminder.members(), text);
            self.notify(notice);
        }
    }
}
