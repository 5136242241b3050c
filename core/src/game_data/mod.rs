//! Game data collaborators
//!
//! - **Catalog**: boss health per stage and the cycle -> stage lookup
//! - **Calendar**: the game-day clock (days roll over at a fixed server-local hour)
//! - **Servers**: server code parsing

mod calendar;
mod catalog;
mod servers;
mod stages;

#[cfg(test)]
mod game_data_tests;

pub use calendar::{FixedCalendar, GameCalendar, GameClock, GameDate, SystemCalendar};
pub use catalog::{BossCatalog, StaticCatalog};
pub use servers::{SERVER_CODES, parse_server};
pub use stages::default_stages;
