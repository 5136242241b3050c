//! Shared types for clanboard
//!
//! This crate contains the serializable types that are shared between the
//! engine (clanboard-core) and whatever presents its state: the CLI shell,
//! a web panel, or a chat bot.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod formatting;

pub use config::{BossTableConfig, EngineConfig, StageConfig};
pub use formatting::format_thousands;

/// Chat-platform group id (one clan per group)
pub type GroupId = i64;
/// Chat-platform user id
pub type MemberId = i64;
/// Data slot ("season") id, starting at 0
pub type SlotId = u32;

/// Number of bosses in one cycle
pub const BOSS_COUNT: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Boss Slot
// ─────────────────────────────────────────────────────────────────────────────

/// A boss position in the rotation, numbered 1 through 5.
///
/// Health arrays are indexed with [`BossSlot::index`] (0 through 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BossSlot(u8);

impl BossSlot {
    pub fn new(number: u8) -> Option<Self> {
        (1..=BOSS_COUNT as u8).contains(&number).then_some(Self(number))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOSS_COUNT {
            Some(Self(index as u8 + 1))
        } else {
            None
        }
    }

    /// Boss number as players say it (1-5)
    pub fn number(self) -> u8 {
        self.0
    }

    /// Array index (0-4)
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = BossSlot> {
        (1..=BOSS_COUNT as u8).map(BossSlot)
    }
}

impl TryFrom<u8> for BossSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("boss number must be 1-{BOSS_COUNT}, got {value}"))
    }
}

impl From<BossSlot> for u8 {
    fn from(slot: BossSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for BossSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Game Server
// ─────────────────────────────────────────────────────────────────────────────

/// Game server region. Decides boss tables and the game-day calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    Jp,
    Tw,
    #[default]
    Cn,
    Kr,
}

impl Server {
    pub const ALL: [Server; 4] = [Server::Jp, Server::Tw, Server::Cn, Server::Kr];

    pub fn code(&self) -> &'static str {
        match self {
            Server::Jp => "jp",
            Server::Tw => "tw",
            Server::Cn => "cn",
            Server::Kr => "kr",
        }
    }

    /// Fixed offset of the server's local time from UTC, in hours
    pub fn utc_offset_hours(&self) -> i32 {
        match self {
            Server::Cn | Server::Tw => 8,
            Server::Jp | Server::Kr => 9,
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Echo Flags
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-owned bit set stored with a group.
///
/// The engine persists and exposes these bits but never interprets them; a
/// front end decides which bit means "echo resolve results to the group chat".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EchoFlags(pub u32);

impl EchoFlags {
    pub fn contains(&self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    pub fn insert(&mut self, mask: u32) {
        self.0 |= mask;
    }

    pub fn remove(&mut self, mask: u32) {
        self.0 &= !mask;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation Views
// ─────────────────────────────────────────────────────────────────────────────

/// One boss as shown on a status panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossView {
    pub slot: BossSlot,
    /// Cycle of the instance that is currently attackable (board cycle or cycle + 1)
    pub cycle: u32,
    /// True when the current-cycle instance is dead and the next-cycle one is shown
    pub is_next: bool,
    /// Remaining health; 0 when the boss cannot be attacked right now
    pub health: u64,
    /// Stage maximum for the shown instance
    pub full_health: u64,
    pub reachable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub cycle: u32,
    pub stage: usize,
    pub bosses: Vec<BossView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub member: MemberId,
    pub boss: BossSlot,
    pub is_continue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<MemberId>,
    pub paused_seconds: u32,
    pub pending_damage: u64,
    pub on_tree: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub boss: BossSlot,
    pub member: MemberId,
    #[serde(default)]
    pub note: String,
}

/// Read-only state of one group for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub server: Server,
    pub data_slot: SlotId,
    pub board: BoardView,
    pub sessions: Vec<SessionView>,
    pub subscriptions: Vec<SubscriptionView>,
}

/// Payload delivered to long-poll waiters when a group changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePayload {
    pub board: BoardView,
    /// Board cycle at the time of the change
    pub cycle: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_slot_bounds() {
        assert!(BossSlot::new(0).is_none());
        assert!(BossSlot::new(6).is_none());
        let slot = BossSlot::new(3).unwrap();
        assert_eq!(slot.index(), 2);
        assert_eq!(BossSlot::from_index(2), Some(slot));
        assert_eq!(BossSlot::all().count(), BOSS_COUNT);
    }

    #[test]
    fn boss_slot_rejects_out_of_range_on_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            boss: BossSlot,
        }
        assert!(toml::from_str::<Holder>("boss = 7").is_err());
        let ok: Holder = toml::from_str("boss = 5").unwrap();
        assert_eq!(ok.boss.number(), 5);
    }

    #[test]
    fn echo_flags_masks() {
        let mut flags = EchoFlags::default();
        flags.insert(0b01);
        flags.insert(0b100);
        assert!(flags.contains(0b01));
        assert!(!flags.contains(0b10));
        flags.remove(0b01);
        assert_eq!(flags, EchoFlags(0b100));
    }
}
