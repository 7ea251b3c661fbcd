// src/common/timestamp.rs

use core::fmt;

#[cfg(feature = "std")]
use super::hal_traits::WallClock;

/// Calendar date and time attached to a sample.
///
/// Rendered as `Y-M-D h:m:s` with no zero padding in any field: 09:07:03 on
/// 5 March 2024 prints as `2024-3-5 9:7:3`. Consumers compare
/// timestamps to tell a fresh sample from one they already handled, so two
/// samples taken within the same second compare equal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Timestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Local wall-clock time from the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl WallClock for SystemClock {
    fn now(&mut self) -> Timestamp {
        use chrono::{Datelike, Timelike};

        let now = chrono::Local::now();
        Timestamp::new(
            now.year(),
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }
}
