//! Half-hour grid codec.
//!
//! Converts between wall-clock times, grid slot indices and the `"day-slot"`
//! composite key shared with the drag/drop and rendering layers. Slot `n`
//! covers the half hour starting at `n / 2` hours, so slot 0 is 00:00 and
//! slot 47 is 23:30.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of half-hour slots in a day.
pub const SLOTS_PER_DAY: u8 = 48;
/// Width of one slot in minutes.
pub const SLOT_MINUTES: u32 = 30;

const SLOT_SECONDS: i64 = SLOT_MINUTES as i64 * 60;

/// Errors raised while encoding or decoding grid positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("time {0} is not on the half-hour grid")]
    OffGrid(NaiveTime),
    #[error("slot index {0} is outside the day (0-47)")]
    OutOfRange(u32),
    #[error("end time must be after start time")]
    EmptyRange,
    #[error("malformed grid key '{0}'")]
    MalformedKey(String),
    #[error("malformed time '{0}'")]
    MalformedTime(String),
}

/// A half-hour cell of the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u8);

impl Slot {
    pub const FIRST: Slot = Slot(0);
    pub const LAST: Slot = Slot(SLOTS_PER_DAY - 1);

    pub fn new(index: u32) -> Result<Self, SlotError> {
        if index < SLOTS_PER_DAY as u32 {
            Ok(Self(index as u8))
        } else {
            Err(SlotError::OutOfRange(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Exact conversion; the time must sit on a slot boundary.
    pub fn from_time(time: NaiveTime) -> Result<Self, SlotError> {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(SlotError::OffGrid(time));
        }
        let half = match time.minute() {
            0 => 0,
            30 => 1,
            _ => return Err(SlotError::OffGrid(time)),
        };
        Self::new(time.hour() * 2 + half)
    }

    /// Slot containing `time`.
    pub fn floor(time: NaiveTime) -> Self {
        Self((time.hour() * 2 + time.minute() / SLOT_MINUTES) as u8)
    }

    /// First slot boundary at or after `time`, clamped to the last slot.
    pub fn ceil(time: NaiveTime) -> Self {
        let floor = Self::floor(time);
        let on_boundary = time.minute() % SLOT_MINUTES == 0 && time.second() == 0;
        if on_boundary {
            floor
        } else {
            Self(floor.0.saturating_add(1).min(Self::LAST.0))
        }
    }

    pub fn start_time(self) -> NaiveTime {
        let minutes = self.0 as u32 * SLOT_MINUTES;
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Fixed-offset time at the start of this slot, e.g. `11:00:00+01:00`.
    pub fn to_wall_time(self, offset: FixedOffset) -> WallTime {
        WallTime::with_offset(self.start_time(), offset)
    }

    /// Slot `slots` positions later on the same day.
    pub fn offset_by(self, slots: u8) -> Result<Self, SlotError> {
        Self::new(self.0 as u32 + slots as u32)
    }

    /// Twelve-hour label, e.g. `09:30am`.
    pub fn label(self) -> String {
        self.start_time().format("%I:%M%P").to_string()
    }

    /// Inverse of [`Slot::label`]; accepts `09:30am`, `9:30PM`.
    pub fn from_label(label: &str) -> Result<Self, SlotError> {
        let trimmed = label.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%I:%M%p")
            .map_err(|_| SlotError::MalformedTime(trimmed.to_string()))?;
        Self::from_time(time)
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOTS_PER_DAY).map(Slot)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Labels for the 48 rows of the grid.
pub fn slot_labels() -> Vec<String> {
    Slot::all().map(Slot::label).collect()
}

/// Hour label for the time column, e.g. `9AM`.
pub fn hour_label(hour: u32) -> String {
    NaiveTime::from_hms_opt(hour % 24, 0, 0)
        .map(|t| t.format("%-I%p").to_string())
        .unwrap_or_default()
}

/// Number of slots covered by `start..end`, rounded up.
pub fn duration_in_slots(start: NaiveTime, end: NaiveTime) -> Result<u8, SlotError> {
    let seconds = end.signed_duration_since(start).num_seconds();
    if seconds <= 0 {
        return Err(SlotError::EmptyRange);
    }
    Ok(((seconds + SLOT_SECONDS - 1) / SLOT_SECONDS) as u8)
}

/// Grid cell address; rendered as `"day-slot"` at the UI boundary.
///
/// `day` is a column offset counted from the start of the week the grid is
/// anchored on, so values above 6 address the following week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub day: u32,
    pub slot: Slot,
}

impl SlotKey {
    pub fn new(day: u32, slot: Slot) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.slot)
    }
}

impl FromStr for SlotKey {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotError::MalformedKey(s.to_string());
        let (day, slot) = s.split_once('-').ok_or_else(malformed)?;
        let day = parse_digits(day).ok_or_else(malformed)?;
        let slot = parse_digits(slot).ok_or_else(malformed)?;
        Ok(Self::new(day, Slot::new(slot)?))
    }
}

/// Unsigned decimal made of ASCII digits only; no sign, no padding spaces.
fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Time of day with an optional fixed UTC offset, as exchanged with the
/// persistence API (`09:00:00+01:00`, `09:00:00`, `09:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallTime {
    time: NaiveTime,
    offset: Option<FixedOffset>,
}

impl WallTime {
    pub fn new(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }

    pub fn with_offset(time: NaiveTime, offset: FixedOffset) -> Self {
        Self {
            time,
            offset: Some(offset),
        }
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// `HH:mm`, dropping seconds and offset. Used for occurrence matching.
    pub fn normalized(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.time.hour(), self.time.minute(), 0).unwrap_or(self.time)
    }

    pub fn is_on_grid(&self) -> bool {
        Slot::from_time(self.time).is_ok()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M:%S"))?;
        if let Some(offset) = self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

impl FromStr for WallTime {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || SlotError::MalformedTime(s.to_string());

        // The offset sign can only appear after the `HH:mm` prefix.
        let split = s
            .char_indices()
            .skip(5)
            .find(|(_, c)| matches!(c, '+' | '-' | 'Z' | 'z'))
            .map(|(i, _)| i);
        let (clock, offset) = match split {
            Some(i) => (&s[..i], Some(parse_offset(&s[i..]).ok_or_else(malformed)?)),
            None => (s, None),
        };

        let time = NaiveTime::parse_from_str(clock, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M:%S%.f"))
            .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
            .map_err(|_| malformed())?;

        Ok(Self { time, offset })
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse `Z`, `+01:00`, `-0530` style offsets.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.chars().next()? {
        '+' => (1, &raw[1..]),
        '-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
