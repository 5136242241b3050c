use serde::{Deserialize, Serialize};

use super::record::ChallengeRecord;
use crate::error::EngineError;

/// Full attempts per member per game day
pub const DAILY_ATTEMPTS: u32 = 3;

/// How a normal attempt is handled when only compensation attempts remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Silently treat it as compensation
    #[default]
    AutoUpgrade,
    /// Refuse it
    Strict,
}

impl UpgradePolicy {
    pub fn from_flag(auto_upgrade: bool) -> Self {
        if auto_upgrade {
            UpgradePolicy::AutoUpgrade
        } else {
            UpgradePolicy::Strict
        }
    }
}

/// Admission decision for one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Normal,
    Compensation,
    /// Requested as normal, admitted as compensation
    Upgraded,
}

impl Admission {
    pub fn is_continue(self) -> bool {
        !matches!(self, Admission::Normal)
    }
}

/// One member's attempt accounting for one game day and data slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotaStatus {
    pub records: u32,
    /// Full attempts consumed: attempts that left the boss alive, plus compensation attempts
    pub finished: u32,
    /// Normal attempts that defeated a boss
    pub tail_kills: u32,
    pub all_continue: u32,
    /// Tail-kills not yet consumed by a compensation attempt
    pub credit: u32,
}

impl QuotaStatus {
    /// Tally records of a single member, day and slot
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a ChallengeRecord>) -> Self {
        let mut status = QuotaStatus::default();
        for record in records {
            status.push(record.health_remain, record.is_continue);
        }
        status
    }

    pub fn push(&mut self, health_remain: u64, is_continue: bool) {
        self.records += 1;
        if health_remain != 0 || is_continue {
            self.finished += 1;
        }
        if health_remain == 0 && !is_continue {
            self.tail_kills += 1;
        }
        if is_continue {
            self.all_continue += 1;
        }
        self.credit = self
            .records
            .saturating_sub(self.finished)
            .saturating_sub(self.all_continue);
    }

    pub fn remaining_full(&self) -> u32 {
        DAILY_ATTEMPTS.saturating_sub(self.finished)
    }

    /// Decide whether one more attempt is allowed today.
    pub fn admit(&self, requested_continue: bool, policy: UpgradePolicy) -> Result<Admission, EngineError> {
        if requested_continue {
            if self.credit == 0 {
                return Err(EngineError::QuotaExceeded("no compensation attempts left".into()));
            }
            return Ok(Admission::Compensation);
        }

        if self.finished >= DAILY_ATTEMPTS {
            return Err(EngineError::QuotaExceeded(format!(
                "all {DAILY_ATTEMPTS} full attempts for today are used"
            )));
        }
        if self.finished + self.credit >= DAILY_ATTEMPTS && self.credit > 0 {
            return match policy {
                UpgradePolicy::AutoUpgrade => Ok(Admission::Upgraded),
                UpgradePolicy::Strict => Err(EngineError::QuotaExceeded(
                    "only compensation attempts are left for today".into(),
                )),
            };
        }
        Ok(Admission::Normal)
    }
}
