use clanboard_types::{BossSlot, GroupId, MemberId, SlotId};
use serde::{Deserialize, Serialize};

use crate::game_data::GameDate;

/// A challenge about to be appended; the store assigns its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub group: GroupId,
    pub data_slot: SlotId,
    /// Member who performed the attempt
    pub member: MemberId,
    /// Member who reported it on their behalf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<MemberId>,
    pub date: GameDate,
    pub seconds: u32,
    /// Cycle of the boss instance that was hit
    pub cycle: u32,
    pub boss: BossSlot,
    pub health_remain: u64,
    pub damage: u64,
    pub is_continue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewChallenge {
    pub fn with_seq(self, seq: u64) -> ChallengeRecord {
        ChallengeRecord { seq, entry: self }
    }
}

/// Ledger entry with its per-group insertion sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub seq: u64,
    pub entry: NewChallenge,
}

impl std::ops::Deref for ChallengeRecord {
    type Target = NewChallenge;

    fn deref(&self) -> &NewChallenge {
        &self.entry
    }
}

impl ChallengeRecord {
    pub fn kind(&self) -> AttemptKind {
        AttemptKind::of(self.health_remain, self.is_continue)
    }

    /// Proxy when present, else the member; scores are credited to this id
    pub fn scoring_member(&self) -> MemberId {
        self.proxy.unwrap_or(self.member)
    }

    /// True when `caller` performed or reported this attempt
    pub fn is_owned_by(&self, caller: MemberId) -> bool {
        self.member == caller || self.proxy == Some(caller)
    }
}

/// Classification of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    /// Normal attempt that left the boss alive
    Full,
    /// Normal attempt that defeated the boss; grants one compensation credit
    TailKill,
    /// Compensation attempt that left the boss alive
    Compensation,
    /// Compensation attempt that defeated the boss
    CompensationTailKill,
}

impl AttemptKind {
    pub fn of(health_remain: u64, is_continue: bool) -> Self {
        match (health_remain == 0, is_continue) {
            (false, false) => AttemptKind::Full,
            (true, false) => AttemptKind::TailKill,
            (false, true) => AttemptKind::Compensation,
            (true, true) => AttemptKind::CompensationTailKill,
        }
    }

    pub fn is_continue(self) -> bool {
        matches!(self, AttemptKind::Compensation | AttemptKind::CompensationTailKill)
    }

    pub fn label(self) -> &'static str {
        match self {
            AttemptKind::Full => "full attempt",
            AttemptKind::TailKill => "tail-kill",
            AttemptKind::Compensation => "compensation attempt",
            AttemptKind::CompensationTailKill => "compensation tail-kill",
        }
    }
}

/// Ledger scan scope. `slot: None` scans every data slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChallengeFilter {
    pub group: GroupId,
    pub slot: Option<SlotId>,
    pub member: Option<MemberId>,
    pub date: Option<GameDate>,
}

impl ChallengeFilter {
    pub fn group(group: GroupId) -> Self {
        Self {
            group,
            ..Default::default()
        }
    }

    pub fn slot(mut self, slot: SlotId) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn member(mut self, member: MemberId) -> Self {
        self.member = Some(member);
        self
    }

    pub fn date(mut self, date: GameDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, record: &NewChallenge) -> bool {
        record.group == self.group
            && self.slot.is_none_or(|s| record.data_slot == s)
            && self.member.is_none_or(|m| record.member == m)
            && self.date.is_none_or(|d| record.date == d)
    }
}
