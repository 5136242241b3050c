//! Request and result types of engine operations

use clanboard_types::{BossSlot, MemberId, SubscriptionView};

use crate::board::UndoEffect;
use crate::ledger::{Admission, AttemptKind, ChallengeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub member: MemberId,
    pub boss: BossSlot,
    pub admission: Admission,
}

/// Which sessions `cancel` removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelScope {
    /// The caller's own session
    Own,
    /// Every session on one boss
    Boss(BossSlot),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportClearOutcome {
    Cleared,
    NothingToClear,
}

/// A finished attempt to record.
///
/// Build with [`defeat`](Self::defeat) or [`damage`](Self::damage), then
/// chain the optional parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub caller: MemberId,
    pub on_behalf_of: Option<MemberId>,
    pub boss: Option<BossSlot>,
    pub defeat: bool,
    /// Required unless `defeat`; may arrive negative from user input
    pub damage: Option<i64>,
    pub is_continue: bool,
    pub previous_day: bool,
    pub message: Option<String>,
}

impl ResolveRequest {
    pub fn defeat(caller: MemberId) -> Self {
        Self {
            caller,
            on_behalf_of: None,
            boss: None,
            defeat: true,
            damage: None,
            is_continue: false,
            previous_day: false,
            message: None,
        }
    }

    pub fn damage(caller: MemberId, damage: i64) -> Self {
        Self {
            defeat: false,
            damage: Some(damage),
            ..Self::defeat(caller)
        }
    }

    pub fn on(mut self, boss: BossSlot) -> Self {
        self.boss = Some(boss);
        self
    }

    pub fn on_behalf_of(mut self, member: MemberId) -> Self {
        self.on_behalf_of = Some(member);
        self
    }

    pub fn continued(mut self) -> Self {
        self.is_continue = true;
        self
    }

    pub fn previous_day(mut self) -> Self {
        self.previous_day = true;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub record: ChallengeRecord,
    pub kind: AttemptKind,
    /// Full attempts used today after this one
    pub finished_today: u32,
    /// Compensation attempts left today after this one
    pub credit_left: u32,
    /// New board cycle when this attempt closed the cycle
    pub rolled_over_to: Option<u32>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    pub record: ChallengeRecord,
    pub effect: UndoEffect,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeTarget {
    Boss(BossSlot),
    /// List every subscription instead of subscribing
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Subscribed(BossSlot),
    Table(Vec<SubscriptionView>),
}

/// Save-load ("SL") bookkeeping action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveLoadAction {
    Record,
    Check,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveLoadOutcome {
    Recorded,
    /// Whether today is already marked
    Marked(bool),
    Cancelled,
}
