//! Boss progression state
//!
//! Each group fights five bosses per cycle. Killing a boss early exposes its
//! next-cycle instance (while the stage stays the same); once all five
//! current instances are dead the board rolls over into the next cycle.

mod state;

#[cfg(test)]
mod board_tests;

pub use state::{BoardEdit, BossBoard, DamageTarget, MAX_CYCLE, Pool, Rollover, UndoEffect};
