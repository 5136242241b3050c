//! Daily progress and score reports over scanned records
//!
//! Attempt counts are kept in halves: a tail-kill or a compensation attempt
//! is half an attempt, anything else is a whole one.

use std::collections::BTreeMap;

use clanboard_types::MemberId;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::quota::DAILY_ATTEMPTS;
use super::record::{AttemptKind, ChallengeRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProgress {
    pub member: MemberId,
    pub halves: u32,
    /// Tail-kills minus compensation attempts; negative when over-compensated
    pub pending_compensation: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Members with at least one record, in roster order
    pub members: Vec<MemberProgress>,
    /// Roster members without any record
    pub idle: Vec<MemberId>,
    /// Number of members per attempts-used value (in halves)
    pub histogram: BTreeMap<u32, usize>,
    pub pending_compensation: i32,
    pub total_halves: u32,
    /// Whole attempts available to the roster today
    pub capacity: u32,
}

impl DailyProgress {
    pub fn total_attempts(&self) -> f64 {
        f64::from(self.total_halves) / 2.0
    }
}

/// Progress of one day's records against a roster.
///
/// `records` should already be scoped to one group, slot and game date.
pub fn daily_progress(records: &[ChallengeRecord], roster: &[MemberId]) -> DailyProgress {
    let mut by_member: HashMap<MemberId, Vec<&ChallengeRecord>> = HashMap::new();
    for record in records {
        by_member.entry(record.member).or_default().push(record);
    }

    let mut progress = DailyProgress {
        capacity: roster.len() as u32 * DAILY_ATTEMPTS,
        ..Default::default()
    };
    for &member in roster {
        let Some(mine) = by_member.get(&member) else {
            progress.idle.push(member);
            continue;
        };
        let mut halves = 0;
        let mut pending = 0i32;
        for record in mine {
            match record.kind() {
                AttemptKind::TailKill => {
                    halves += 1;
                    pending += 1;
                }
                AttemptKind::Compensation | AttemptKind::CompensationTailKill => {
                    halves += 1;
                    pending -= 1;
                }
                AttemptKind::Full => halves += 2,
            }
        }
        progress.total_halves += halves;
        progress.pending_compensation += pending;
        *progress.histogram.entry(halves).or_default() += 1;
        progress.members.push(MemberProgress {
            member,
            halves,
            pending_compensation: pending,
        });
    }
    progress
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub member: MemberId,
    /// Score in half points
    pub score_halves: u32,
    pub full: u32,
    pub tail_kills: u32,
    pub compensation: u32,
}

impl ScoreRow {
    fn new(member: MemberId) -> Self {
        Self {
            member,
            score_halves: 0,
            full: 0,
            tail_kills: 0,
            compensation: 0,
        }
    }

    pub fn score(&self) -> f64 {
        f64::from(self.score_halves) / 2.0
    }
}

/// Score every attempt, crediting the proxy when one reported it.
///
/// Full attempts earn a point. Tail-kills and compensation attempts earn a
/// point when their damage reaches `threshold`, half a point otherwise.
pub fn score_table(records: &[ChallengeRecord], threshold: u64) -> Vec<ScoreRow> {
    let mut rows: Vec<ScoreRow> = Vec::new();
    let mut index: HashMap<MemberId, usize> = HashMap::new();

    for record in records {
        let member = record.scoring_member();
        let slot = *index.entry(member).or_insert_with(|| {
            rows.push(ScoreRow::new(member));
            rows.len() - 1
        });
        let row = &mut rows[slot];
        let partial = if record.damage >= threshold { 2 } else { 1 };
        match record.kind() {
            AttemptKind::Full => {
                row.full += 1;
                row.score_halves += 2;
            }
            AttemptKind::TailKill => {
                row.tail_kills += 1;
                row.score_halves += partial;
            }
            AttemptKind::Compensation | AttemptKind::CompensationTailKill => {
                row.compensation += 1;
                row.score_halves += partial;
            }
        }
    }

    // Stable: ties keep first-appearance order
    rows.sort_by(|a, b| b.score_halves.cmp(&a.score_halves));
    rows
}
