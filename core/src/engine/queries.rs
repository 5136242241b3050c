//! Read-only views and long-poll waiting

use std::time::Duration;

use clanboard_types::{GroupId, GroupSnapshot, SlotId};

use super::ClanBattleEngine;
use crate::channel::{ChangeWaiter, WaitOutcome};
use crate::error::EngineError;
use crate::game_data::{GameCalendar, GameDate};
use crate::ledger::{self, ChallengeFilter, ChallengeRecord, DailyProgress, ScoreRow};

impl ClanBattleEngine {
    /// Board, sessions and subscriptions of the live slot
    pub async fn snapshot(&self, group: GroupId) -> Result<GroupSnapshot, EngineError> {
        self.read(group, |record| {
            Ok(GroupSnapshot {
                group,
                name: record.meta.name.clone(),
                server: record.server(),
                data_slot: record.data_slot,
                board: record.board.view(record.server(), self.catalog.as_ref()),
                sessions: record.sessions.views(),
                subscriptions: record.subscriptions.views(),
            })
        })
        .await
    }

    /// Ledger scan, ordered by sequence
    pub async fn challenges(&self, filter: &ChallengeFilter) -> Result<Vec<ChallengeRecord>, EngineError> {
        self.read(filter.group, |_| Ok(self.store.challenges(filter)?)).await
    }

    /// Attempt usage of the roster on one game day of the live slot.
    ///
    /// `date` defaults to today.
    pub async fn daily_progress(&self, group: GroupId, date: Option<GameDate>) -> Result<DailyProgress, EngineError> {
        self.read(group, |record| {
            let date = date.unwrap_or_else(|| self.calendar.today(record.server()));
            let filter = ChallengeFilter::group(group).slot(record.data_slot).date(date);
            let records = self.store.challenges(&filter)?;
            let roster: Vec<_> = self.store.members(group)?.into_iter().map(|m| m.id).collect();
            Ok(ledger::daily_progress(&records, &roster))
        })
        .await
    }

    /// Scores over every record of a slot, highest first. `slot` defaults to the live one.
    pub async fn score_table(&self, group: GroupId, slot: Option<SlotId>) -> Result<Vec<ScoreRow>, EngineError> {
        self.read(group, |record| {
            let slot = slot.unwrap_or(record.data_slot);
            let records = self.store.challenges(&ChallengeFilter::group(group).slot(slot))?;
            Ok(ledger::score_table(&records, record.meta.threshold))
        })
        .await
    }

    /// Number of ledger records per data slot
    pub async fn record_counts(&self, group: GroupId) -> Result<Vec<(SlotId, usize)>, EngineError> {
        self.read(group, |_| Ok(self.store.record_counts(group)?)).await
    }

    /// Register for the group's next change now, wait later
    pub async fn waiter(&self, group: GroupId) -> Result<ChangeWaiter, EngineError> {
        self.read(group, |_| Ok(self.channel.waiter(group))).await
    }

    /// Wait for the group's next change. `timeout` defaults to the configured long-poll timeout.
    pub async fn wait(&self, group: GroupId, timeout: Option<Duration>) -> Result<WaitOutcome, EngineError> {
        let outcome = self.waiter(group).await?.wait(timeout.unwrap_or(self.long_poll)).await;
        if outcome == WaitOutcome::Unchanged {
            self.channel.release(group);
        }
        Ok(outcome)
    }
}
