//! Boss subscriptions

mod board;

#[cfg(test)]
mod board_tests;

pub use board::{Reminder, Subscription, SubscriptionBoard};
