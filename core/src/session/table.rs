use clanboard_types::{BossSlot, MemberId, SessionView};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An in-flight attempt on one boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSession {
    pub member: MemberId,
    pub boss: BossSlot,
    pub is_continue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<MemberId>,
    /// Paused report: seconds left on the battle timer
    #[serde(default)]
    pub paused_seconds: u32,
    /// Paused report: damage dealt so far
    #[serde(default)]
    pub pending_damage: u64,
    #[serde(default)]
    pub on_tree: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ChallengeSession {
    pub fn new(member: MemberId, boss: BossSlot, is_continue: bool, proxy: Option<MemberId>) -> Self {
        Self {
            member,
            boss,
            is_continue,
            proxy: proxy.filter(|&p| p != member),
            paused_seconds: 0,
            pending_damage: 0,
            on_tree: false,
            note: None,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            member: self.member,
            boss: self.boss,
            is_continue: self.is_continue,
            proxy: self.proxy,
            paused_seconds: self.paused_seconds,
            pending_damage: self.pending_damage,
            on_tree: self.on_tree,
            note: self.note.clone(),
        }
    }
}

/// In-flight sessions of one group, at most one per member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTable {
    sessions: Vec<ChallengeSession>,
}

impl SessionTable {
    pub fn get(&self, member: MemberId) -> Option<&ChallengeSession> {
        self.sessions.iter().find(|s| s.member == member)
    }

    fn get_mut(&mut self, member: MemberId) -> Result<&mut ChallengeSession, EngineError> {
        self.sessions
            .iter_mut()
            .find(|s| s.member == member)
            .ok_or_else(|| EngineError::not_found("no active challenge session"))
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChallengeSession> {
        self.sessions.iter()
    }

    pub fn on_boss(&self, boss: BossSlot) -> impl Iterator<Item = &ChallengeSession> {
        self.sessions.iter().filter(move |s| s.boss == boss)
    }

    /// Tree-flagged sessions, optionally for one boss
    pub fn tree(&self, boss: Option<BossSlot>) -> impl Iterator<Item = &ChallengeSession> {
        self.sessions
            .iter()
            .filter(move |s| s.on_tree && boss.is_none_or(|b| s.boss == b))
    }

    /// Open a session. Quota and board checks are the caller's job.
    pub fn apply(&mut self, session: ChallengeSession) -> Result<&ChallengeSession, EngineError> {
        if let Some(existing) = self.get(session.member) {
            return Err(EngineError::Conflict(format!(
                "already challenging boss {}",
                existing.boss
            )));
        }
        self.sessions.push(session);
        let last = self.sessions.len() - 1;
        Ok(&self.sessions[last])
    }

    /// Overwrite the paused report
    pub fn report(&mut self, member: MemberId, seconds: u32, damage: u64) -> Result<(), EngineError> {
        let session = self.get_mut(member)?;
        session.paused_seconds = seconds;
        session.pending_damage = damage;
        Ok(())
    }

    /// Clear the paused report. Returns false when there was nothing to clear.
    pub fn report_clear(&mut self, member: MemberId) -> Result<bool, EngineError> {
        let session = self.get_mut(member)?;
        if session.pending_damage == 0 && session.paused_seconds == 0 {
            return Ok(false);
        }
        session.paused_seconds = 0;
        session.pending_damage = 0;
        Ok(true)
    }

    pub fn enter_tree(&mut self, member: MemberId, note: Option<String>) -> Result<(), EngineError> {
        let session = self.get_mut(member)?;
        if session.on_tree {
            return Err(EngineError::Conflict("already on the tree".into()));
        }
        session.on_tree = true;
        session.note = note;
        Ok(())
    }

    pub fn exit_tree(&mut self, member: MemberId) -> Result<(), EngineError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.member == member && s.on_tree)
            .ok_or_else(|| EngineError::not_found("not on the tree"))?;
        session.on_tree = false;
        session.note = None;
        Ok(())
    }

    /// Move a member's session to another boss, keeping its flags
    pub fn retarget(&mut self, member: MemberId, boss: BossSlot) -> Result<(), EngineError> {
        self.get_mut(member)?.boss = boss;
        Ok(())
    }

    pub fn remove(&mut self, member: MemberId) -> Option<ChallengeSession> {
        let pos = self.sessions.iter().position(|s| s.member == member)?;
        Some(self.sessions.remove(pos))
    }

    /// Remove every session on one boss, returning them in table order
    pub fn remove_boss(&mut self, boss: BossSlot) -> Vec<ChallengeSession> {
        let (removed, kept) = std::mem::take(&mut self.sessions)
            .into_iter()
            .partition(|s| s.boss == boss);
        self.sessions = kept;
        removed
    }

    pub fn clear(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        count
    }

    pub fn views(&self) -> Vec<SessionView> {
        self.sessions.iter().map(ChallengeSession::view).collect()
    }
}
