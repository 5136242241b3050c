//! In-flight challenge sessions
//!
//! A session opens when a member applies to fight a boss and ends when the
//! attempt is resolved or cancelled. While open it can carry a paused damage
//! report and a "hanging on the tree" flag with a note.

mod table;

#[cfg(test)]
mod table_tests;

pub use table::{ChallengeSession, SessionTable};
