//! Group and member records

use clanboard_types::{EchoFlags, GroupId, MemberId, Server, SlotId};
use serde::{Deserialize, Serialize};

use crate::board::BossBoard;
use crate::game_data::GameDate;
use crate::session::SessionTable;
use crate::subscription::SubscriptionBoard;

/// Group settings that travel with backups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub server: Server,
    #[serde(default)]
    pub privacy: u8,
    #[serde(default)]
    pub echo: EchoFlags,
    /// Damage at or above which a tail-kill scores a full point
    #[serde(default)]
    pub threshold: u64,
    #[serde(default)]
    pub deleted: bool,
}

impl GroupMeta {
    pub fn new(server: Server, name: Option<String>) -> Self {
        Self {
            name,
            server,
            privacy: 0,
            echo: EchoFlags::default(),
            threshold: 0,
            deleted: false,
        }
    }
}

/// Everything the engine keeps in memory for one group.
///
/// Sessions and subscriptions belong to the current data slot and are
/// persisted together with the board in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub meta: GroupMeta,
    pub data_slot: SlotId,
    pub board: BossBoard,
    #[serde(default)]
    pub sessions: SessionTable,
    #[serde(default)]
    pub subscriptions: SubscriptionBoard,
}

impl GroupRecord {
    pub fn server(&self) -> Server {
        self.meta.server
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub group: GroupId,
    pub id: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Game date of the last recorded save-load, 0 when never used
    #[serde(default)]
    pub last_save_slot: GameDate,
}

impl Member {
    pub fn new(group: GroupId, id: MemberId, nickname: Option<String>, role: Role) -> Self {
        Self {
            group,
            id,
            nickname,
            role,
            last_save_slot: GameDate(0),
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }

    pub fn display_name(&self) -> String {
        self.nickname.clone().unwrap_or_else(|| self.id.to_string())
    }
}
