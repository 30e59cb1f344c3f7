//! Occurrences: one dated instance of an event definition as placed on the grid.
//!
//! Occurrences are rebuilt from definitions on every refresh and never edited
//! in place; a changed occurrence is a new value replacing the old one by key.

use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::models::event::{EventDefinition, EventId};
use crate::utils::date;
use crate::utils::slot::{duration_in_slots, Slot, WallTime};

/// Length of the `yyyy-MM-dd` suffix in an `"id-date"` key.
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub event: EventDefinition,
    /// Column within the event's week, 0 being the configured first weekday.
    pub day_of_week: u8,
    pub start_slot: Slot,
    pub end_slot: Slot,
}

impl Occurrence {
    /// Place `event` on the grid. Start times are floored and end times
    /// ceiled to the nearest slot so imported off-grid events still render.
    ///
    /// An end at or before the start (typically `00:00`) runs to the bottom
    /// of the grid.
    pub fn project(event: EventDefinition, week_start: Weekday) -> Self {
        let start_slot = Slot::floor(event.start_time.time());
        let end_slot = if event.end_time.time() > event.start_time.time() {
            Slot::ceil(event.end_time.time())
        } else {
            log::debug!(
                "Event {} on {} ends at {}, clamped to the end of the day",
                event.id,
                event.date,
                event.end_time
            );
            Slot::LAST
        };
        Self {
            day_of_week: date::day_of_week(event.date, week_start),
            start_slot,
            end_slot,
            event,
        }
    }

    pub fn id(&self) -> EventId {
        self.event.id
    }

    pub fn date(&self) -> NaiveDate {
        self.event.date
    }

    pub fn is_repeated(&self) -> bool {
        self.event.repeated
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey::new(self.event.id, self.event.date)
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(self.event.id, self.event.date, self.event.start_time)
    }

    /// Duration in slots, at least one. Events ending past midnight count
    /// up to the clamped end slot.
    pub fn duration_slots(&self) -> u8 {
        duration_in_slots(self.event.start_time.time(), self.event.end_time.time())
            .unwrap_or_else(|_| self.end_slot.index().saturating_sub(self.start_slot.index()))
            .max(1)
    }
}

/// Identity of an occurrence: definition id plus the date it falls on.
/// Rendered as `"id-date"` at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceKey {
    pub id: EventId,
    pub date: NaiveDate,
}

impl OccurrenceKey {
    pub fn new(id: EventId, date: NaiveDate) -> Self {
        Self { id, date }
    }
}

impl fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceKeyError(pub String);

impl fmt::Display for OccurrenceKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed occurrence key '{}'", self.0)
    }
}

impl std::error::Error for OccurrenceKeyError {}

impl FromStr for OccurrenceKey {
    type Err = OccurrenceKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OccurrenceKeyError(s.to_string());
        // Ids may be negative, so split on the fixed-width date suffix.
        if !s.is_ascii() || s.len() < DATE_LEN + 2 {
            return Err(malformed());
        }
        let (id, rest) = s.split_at(s.len() - DATE_LEN - 1);
        let date = rest.strip_prefix('-').ok_or_else(malformed)?;
        if !date.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
            return Err(malformed());
        }
        let digits = id.strip_prefix('-').unwrap_or(id);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let id = id.parse::<i64>().map_err(|_| malformed())?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| malformed())?;
        Ok(Self::new(EventId(id), date))
    }
}

/// Lookup key for edit/delete targets.
///
/// Series members share an id, so they match on id, date and start time
/// (`HH:mm`); a standalone event matches on id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub id: EventId,
    pub date: NaiveDate,
    pub start: NaiveTime,
}

impl MatchKey {
    pub fn new(id: EventId, date: NaiveDate, start: WallTime) -> Self {
        Self {
            id,
            date,
            start: start.normalized(),
        }
    }

    pub fn matches(&self, event: &EventDefinition) -> bool {
        if event.id != self.id {
            return false;
        }
        if event.repeated {
            event.date == self.date && event.start_time.normalized() == self.start
        } else {
            true
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} at {}", self.id, self.date, self.start.format("%H:%M"))
    }
}
