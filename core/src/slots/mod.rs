//! Data slots
//!
//! A group can keep several independent "seasons" of progress. Only one is
//! live at a time; the others exist as versioned JSON backups plus their
//! ledger records.

mod manager;
mod snapshot;

#[cfg(test)]
mod slots_tests;

pub use manager::{backup_op, first_unused_slot, reset, switch};
pub use snapshot::{BackupSnapshot, SNAPSHOT_VERSION};
