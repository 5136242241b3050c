//! Outbound notifications and nickname lookup
//!
//! Both collaborators are best effort: the engine logs their failures and
//! carries on.

use clanboard_types::{GroupId, MemberId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification sink failed: {0}")]
    Sink(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyTarget {
    Group(GroupId),
    Private(MemberId),
}

/// One message to push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: NotifyTarget,
    /// Members to mention, in order
    pub mentions: Vec<MemberId>,
    pub text: String,
}

impl Notice {
    pub fn group(group: GroupId, mentions: Vec<MemberId>, text: impl Into<String>) -> Self {
        Self {
            target: NotifyTarget::Group(group),
            mentions,
            text: text.into(),
        }
    }

    pub fn private(member: MemberId, text: impl Into<String>) -> Self {
        Self {
            target: NotifyTarget::Private(member),
            mentions: Vec::new(),
            text: text.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn push(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Chat-platform display names
pub trait NicknameResolver: Send + Sync {
    fn nickname(&self, member: MemberId) -> Option<String>;
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn push(&self, notice: &Notice) -> Result<(), NotifyError> {
        tracing::info!(target_kind = ?notice.target, mentions = ?notice.mentions, "{}", notice.text);
        Ok(())
    }
}

/// Resolver that never knows a name, so stored nicknames are used
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNicknames;

impl NicknameResolver for NoNicknames {
    fn nickname(&self, _member: MemberId) -> Option<String> {
        None
    }
}
