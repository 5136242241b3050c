//! Error taxonomy for engine operations

use clanboard_types::BossSlot;
use thiserror::Error;

use crate::storage::StoreError;

/// Failure of an engine operation.
///
/// Every variant carries a message fit to show to the member who issued the
/// command. The engine never retries; callers decide how to present these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("boss {boss} cannot be attacked: {reason}")]
    InvalidBossState { boss: BossSlot, reason: &'static str },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("storage unavailable")]
    Upstream(#[from] StoreError),
}

/// Coarse classification of [`EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    QuotaExceeded,
    InvalidBossState,
    InvalidInput,
    Unauthorized,
    UpstreamUnavailable,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            EngineError::InvalidBossState { .. } => ErrorKind::InvalidBossState,
            EngineError::InvalidInput(_) => ErrorKind::InvalidInput,
            EngineError::Unauthorized(_) => ErrorKind::Unauthorized,
            EngineError::Upstream(_) => ErrorKind::UpstreamUnavailable,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound(what.into())
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidInput(reason.into())
    }
}
