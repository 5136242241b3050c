use clanboard_types::{BossSlot, MemberId, SubscriptionView};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub boss: BossSlot,
    pub member: MemberId,
    #[serde(default)]
    pub note: String,
}

/// One combined "boss is back" reminder for every subscriber of a boss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub boss: BossSlot,
    /// Subscribers with their notes, in subscription order
    pub subscribers: Vec<(MemberId, String)>,
}

impl Reminder {
    pub fn members(&self) -> Vec<MemberId> {
        self.subscribers.iter().map(|(m, _)| *m).collect()
    }
}

/// One-shot "tell me when this boss is available" registrations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionBoard {
    entries: Vec<Subscription>,
}

impl SubscriptionBoard {
    pub fn is_subscribed(&self, boss: BossSlot, member: MemberId) -> bool {
        self.entries.iter().any(|s| s.boss == boss && s.member == member)
    }

    pub fn subscribe(&mut self, boss: BossSlot, member: MemberId, note: impl Into<String>) -> Result<(), EngineError> {
        if self.is_subscribed(boss, member) {
            return Err(EngineError::Conflict(format!("already subscribed to boss {boss}")));
        }
        self.entries.push(Subscription {
            boss,
            member,
            note: note.into(),
        });
        Ok(())
    }

    /// Drop one member's subscription, or every subscription on the boss.
    ///
    /// Returns the number of entries removed.
    pub fn cancel(&mut self, boss: BossSlot, member: Option<MemberId>) -> Result<usize, EngineError> {
        let before = self.entries.len();
        match member {
            Some(member) => {
                if !self.is_subscribed(boss, member) {
                    return Err(EngineError::not_found(format!("not subscribed to boss {boss}")));
                }
                self.entries.retain(|s| !(s.boss == boss && s.member == member));
            }
            None => self.entries.retain(|s| s.boss != boss),
        }
        Ok(before - self.entries.len())
    }

    /// Take every subscriber of a boss. None when nobody is waiting.
    pub fn fire(&mut self, boss: BossSlot) -> Option<Reminder> {
        let subscribers: Vec<_> = self
            .entries
            .iter()
            .filter(|s| s.boss == boss)
            .map(|s| (s.member, s.note.clone()))
            .collect();
        if subscribers.is_empty() {
            return None;
        }
        self.entries.retain(|s| s.boss != boss);
        Some(Reminder { boss, subscribers })
    }

    /// Listing grouped by boss number. NotFound when empty.
    pub fn table(&self) -> Result<Vec<SubscriptionView>, EngineError> {
        if self.entries.is_empty() {
            return Err(EngineError::not_found("nobody is subscribed to any boss"));
        }
        let mut views = self.views();
        views.sort_by_key(|v| v.boss);
        Ok(views)
    }

    pub fn views(&self) -> Vec<SubscriptionView> {
        self.entries
            .iter()
            .map(|s| SubscriptionView {
                boss: s.boss,
                member: s.member,
                note: s.note.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
