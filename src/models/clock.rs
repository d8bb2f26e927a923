//! Operating-day clock.
//!
//! Times are held as minutes since midnight and only rendered in the
//! `H:MM` / `HMM` encodings at formatting and configuration boundaries.
//! The line operates from 07:00 up to (but not including) 11:00; any
//! value outside that window is rejected with
//! [`ClockError::DomainOutOfRange`].
//!
//! # Slots
//!
//! Passenger arrivals are bucketed into 10-minute slots from 07:00 to
//! 10:00 inclusive (19 slots). Every time at or after 10:00 falls into
//! the final slot.
//!
//! # Rollover
//!
//! Travel time crossing into a new hour before 10:00 snaps to the top of
//! that hour (7:55 + 11 min arrives 8:00). Crossing into the 10 o'clock
//! hour keeps exact minutes (9:58 + 4 min is 10:02). Timetables built
//! against this line model depend on that behaviour, so it is kept as is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First minute of the operating window (07:00).
pub const OPEN_MINUTE: u16 = 7 * 60;
/// First minute past the operating window (11:00).
pub const CLOSE_MINUTE: u16 = 11 * 60;
/// Width of a demand slot in minutes.
pub const SLOT_MINUTES: u16 = 10;
/// Number of demand slots (07:00..=10:00).
pub const SLOT_COUNT: usize = 19;

const LAST_SLOT_MINUTE: u16 = 10 * 60;

/// Errors raised by clock construction and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// Value (in `HMM` encoding) lies outside 07:00..11:00.
    DomainOutOfRange(i64),
    /// Minute digits of an `HMM` value are 60 or more.
    InvalidMinute(u32),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::DomainOutOfRange(hmm) => {
                write!(f, "time {hmm} is outside the 7:00-10:59 operating window")
            }
            ClockError::InvalidMinute(hmm) => write!(f, "time {hmm} has invalid minute digits"),
        }
    }
}

impl std::error::Error for ClockError {}

/// A time of day within the operating window.
///
/// # Example
/// ```
/// use line_schedule::models::ClockTime;
///
/// let t = ClockTime::from_hmm(729).unwrap();
/// assert_eq!(t.to_string(), "7:29");
/// assert_eq!(t.slot().to_hmm(), 720);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self, ClockError> {
        if minutes < OPEN_MINUTE as u32 || minutes >= CLOSE_MINUTE as u32 {
            return Err(ClockError::DomainOutOfRange(encode(minutes as i64)));
        }
        Ok(Self(minutes as u16))
    }

    /// Creates a time from an hour and a minute.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ClockError> {
        if minute >= 60 {
            return Err(ClockError::InvalidMinute(hour * 100 + minute));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Parses the strict `HMM` encoding (`729` is 7:29).
    pub fn from_hmm(hmm: u32) -> Result<Self, ClockError> {
        Self::from_hm(hmm / 100, hmm % 100)
    }

    /// Builds a time from an `HMM` constant, failing const evaluation
    /// when the value is not a valid time in the operating window.
    pub(crate) const fn from_hmm_const(hmm: u16) -> Self {
        let minutes = (hmm / 100) * 60 + hmm % 100;
        assert!(hmm % 100 < 60 && minutes >= OPEN_MINUTE && minutes < CLOSE_MINUTE);
        Self(minutes)
    }

    /// Returns the `HMM` encoding.
    pub fn to_hmm(self) -> u32 {
        self.hour() * 100 + self.minute()
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    /// Hour of day.
    #[inline]
    pub fn hour(self) -> u32 {
        self.0 as u32 / 60
    }

    /// Minute of the hour.
    #[inline]
    pub fn minute(self) -> u32 {
        self.0 as u32 % 60
    }

    /// Minutes elapsed since `earlier` (zero if `earlier` is later).
    pub fn minutes_since(self, earlier: ClockTime) -> u32 {
        self.minutes().saturating_sub(earlier.minutes())
    }

    /// Most recent slot boundary at or before this time, clamped to 10:00.
    pub fn slot(self) -> ClockTime {
        if self.0 >= LAST_SLOT_MINUTE {
            ClockTime(LAST_SLOT_MINUTE)
        } else {
            ClockTime(self.0 - self.0 % SLOT_MINUTES)
        }
    }

    /// Index of [`Self::slot`] in `0..SLOT_COUNT`.
    pub fn slot_index(self) -> usize {
        ((self.slot().0 - OPEN_MINUTE) / SLOT_MINUTES) as usize
    }

    /// Boundary time of the slot at `index`.
    pub fn slot_at(index: usize) -> Option<ClockTime> {
        (index < SLOT_COUNT).then(|| ClockTime(OPEN_MINUTE + index as u16 * SLOT_MINUTES))
    }

    /// Moves forward by `minutes` of travel.
    ///
    /// Crossing into a new hour before 10:00 lands on the top of that hour.
    pub fn advance(self, minutes: u32) -> Result<Self, ClockError> {
        let raw = self.minutes() + minutes;
        let (from_hour, to_hour) = (self.hour(), raw / 60);
        if to_hour > from_hour && to_hour < 10 {
            Self::from_minutes(to_hour * 60)
        } else {
            Self::from_minutes(raw)
        }
    }

    /// Perturbs the time by a signed number of minutes.
    ///
    /// Forward shifts follow [`Self::advance`]. Backward shifts subtract
    /// from the `HMM` encoding and [`normalize`] the result, so 8:03 - 5
    /// is 8:00 and 10:00 - 5 is 10:35.
    pub fn shift(self, delta: i32) -> Result<Self, ClockError> {
        if delta >= 0 {
            return self.advance(delta as u32);
        }
        let encoded = self.to_hmm() as i64 + delta as i64;
        let hmm = u32::try_from(encoded).map_err(|_| ClockError::DomainOutOfRange(encoded))?;
        normalize(hmm)
    }
}

/// Maps a time to its demand slot boundary.
pub fn slot_of(time: ClockTime) -> ClockTime {
    time.slot()
}

/// Converts a loose `HMM` value whose minute digits may exceed 59.
///
/// - `960..=999` becomes `10:00 + (hmm - 960)` minutes.
/// - Values from `1000` must already carry valid minute digits.
/// - Below that, minute digits of 60 or more roll to the top of the
///   next hour (`765` is 8:00); others pass through (`959` is 9:59).
pub fn normalize(hmm: u32) -> Result<ClockTime, ClockError> {
    if (960..1000).contains(&hmm) {
        return ClockTime::from_minutes(LAST_SLOT_MINUTE as u32 + (hmm - 960));
    }
    if hmm >= 1000 {
        return ClockTime::from_hmm(hmm);
    }
    let (hour, minute) = (hmm / 100, hmm % 100);
    if minute >= 60 {
        ClockTime::from_minutes((hour + 1) * 60)
    } else {
        ClockTime::from_hm(hour, minute)
    }
}

fn encode(minutes: i64) -> i64 {
    minutes.div_euclid(60) * 100 + minutes.rem_euclid(60)
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<u32> for ClockTime {
    type Error = ClockError;

    fn try_from(hmm: u32) -> Result<Self, Self::Error> {
        Self::from_hmm(hmm)
    }
}

impl From<ClockTime> for u32 {
    fn from(time: ClockTime) -> Self {
        time.to_hmm()
    }
}
