//! Game-day calendar.
//!
//! A game day starts at the reset hour in the server's local time, so an
//! attempt at 03:00 local still belongs to the previous day.

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use clanboard_types::Server;
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Days since the Unix epoch, counted in game days
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameDate(pub i32);

impl GameDate {
    pub fn previous(self) -> GameDate {
        GameDate(self.0 - 1)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in game time: the game date plus seconds elapsed since the day reset.
///
/// `seconds` may exceed one day for back-filled records, which are dated one
/// day earlier but keep their real position after the reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameClock {
    pub date: GameDate,
    pub seconds: u32,
}

impl GameClock {
    /// Same moment, filed under the previous game day
    pub fn back_filled(self) -> GameClock {
        GameClock {
            date: self.date.previous(),
            seconds: self.seconds + SECONDS_PER_DAY,
        }
    }
}

pub trait GameCalendar: Send + Sync {
    fn now(&self, server: Server) -> GameClock;

    fn today(&self, server: Server) -> GameDate {
        self.now(server).date
    }
}

/// Wall-clock calendar using fixed server UTC offsets.
#[derive(Debug, Clone, Copy)]
pub struct SystemCalendar {
    reset_hour: u32,
}

impl SystemCalendar {
    pub fn new(reset_hour: u32) -> Self {
        Self {
            reset_hour: reset_hour % 24,
        }
    }

    pub fn at(&self, server: Server, instant: DateTime<Utc>) -> GameClock {
        let shift = (i64::from(server.utc_offset_hours()) - i64::from(self.reset_hour)) * 3600;
        let ts = instant.timestamp() + shift;
        let day = i64::from(SECONDS_PER_DAY);
        GameClock {
            date: GameDate(ts.div_euclid(day) as i32),
            seconds: ts.rem_euclid(day) as u32,
        }
    }
}

impl Default for SystemCalendar {
    fn default() -> Self {
        Self::new(5)
    }
}

impl GameCalendar for SystemCalendar {
    fn now(&self, server: Server) -> GameClock {
        self.at(server, Utc::now())
    }
}

/// Manually driven calendar, shared by reference between an engine and its driver.
#[derive(Debug, Default)]
pub struct FixedCalendar {
    date: AtomicI32,
    seconds: AtomicU32,
}

impl FixedCalendar {
    pub fn new(date: GameDate, seconds: u32) -> Self {
        Self {
            date: AtomicI32::new(date.0),
            seconds: AtomicU32::new(seconds),
        }
    }

    pub fn set(&self, date: GameDate, seconds: u32) {
        self.date.store(date.0, Ordering::SeqCst);
        self.seconds.store(seconds, Ordering::SeqCst);
    }

    /// Move forward by whole game days, keeping the time of day
    pub fn advance_days(&self, days: i32) {
        self.date.fetch_add(days, Ordering::SeqCst);
    }

    pub fn advance_seconds(&self, seconds: u32) {
        let total = self.seconds.load(Ordering::SeqCst) + seconds;
        let days = total / SECONDS_PER_DAY;
        self.seconds.store(total % SECONDS_PER_DAY, Ordering::SeqCst);
        self.date.fetch_add(days as i32, Ordering::SeqCst);
    }
}

impl GameCalendar for FixedCalendar {
    fn now(&self, _server: Server) -> GameClock {
        GameClock {
            date: GameDate(self.date.load(Ordering::SeqCst)),
            seconds: self.seconds.load(Ordering::SeqCst),
        }
    }
}
