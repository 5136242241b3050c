//! Challenge ledger
//!
//! Append-only attempt history plus the pure quota and report computations
//! that run over scanned records. Storage of the records lives in
//! [`crate::storage`].

mod quota;
mod record;
mod report;


pub use quota::{Admission, DAILY_ATTEMPTS, QuotaStatus, UpgradePolicy};
pub use record::{AttemptKind, ChallengeFilter, ChallengeRecord, NewChallenge};
pub use report::{DailyProgress, MemberProgress, ScoreRow, daily_progress, score_table};
