// UI models module
// Calendar views and the visible grid window the renderer draws

use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::date;
use crate::utils::slot::{Slot, SlotKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    #[serde(alias = "three")]
    ThreeDay,
    #[default]
    Week,
}

impl CalendarView {
    pub fn columns(&self) -> u32 {
        match self {
            CalendarView::Day => 1,
            CalendarView::ThreeDay => 3,
            CalendarView::Week => 7,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "single" => Some(CalendarView::Day),
            "three" | "threeday" | "triple" => Some(CalendarView::ThreeDay),
            "week" => Some(CalendarView::Week),
            _ => None,
        }
    }
}

/// The run of dates currently on screen.
///
/// Grid columns are numbered from the start of the week containing the first
/// visible date, which keeps `"day-slot"` keys comparable with an
/// occurrence's day of week even when the window straddles two weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    first: NaiveDate,
    days: u32,
    week_start: Weekday,
}

impl GridWindow {
    pub fn new(first: NaiveDate, days: u32, week_start: Weekday) -> Self {
        Self {
            first,
            days: days.max(1),
            week_start,
        }
    }

    /// Window for `view` around the focused date. The three-day view starts
    /// the day before the focus.
    pub fn for_view(view: CalendarView, focus: NaiveDate, week_start: Weekday) -> Self {
        let first = match view {
            CalendarView::Day => focus,
            CalendarView::ThreeDay => date::add_days(focus, -1),
            CalendarView::Week => date::week_start(focus, week_start),
        };
        Self::new(first, view.columns(), week_start)
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        date::add_days(self.first, self.days as i64 - 1)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// First day of the week the column numbering starts from.
    pub fn anchor(&self) -> NaiveDate {
        date::week_start(self.first, self.week_start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|offset| date::add_days(self.first, offset as i64))
            .collect()
    }

    /// Column index of `date`, or `None` if it precedes the anchor week.
    pub fn column_of(&self, date: NaiveDate) -> Option<u32> {
        u32::try_from((date - self.anchor()).num_days()).ok()
    }

    /// Date drawn in column `day`, or `None` past the end of the calendar.
    pub fn date_for_column(&self, day: u32) -> Option<NaiveDate> {
        self.anchor().checked_add_signed(Duration::days(day as i64))
    }

    /// Droppable/cell key for `date` at `slot`, if the date is on screen.
    pub fn slot_key(&self, date: NaiveDate, slot: Slot) -> Option<SlotKey> {
        if !self.contains(date) {
            return None;
        }
        self.column_of(date).map(|day| SlotKey::new(day, slot))
    }

    pub fn shift(&self, days: i64) -> Self {
        Self::new(date::add_days(self.first, days), self.days, self.week_start)
    }

    pub fn next(&self) -> Self {
        self.shift(self.days as i64)
    }

    pub fn previous(&self) -> Self {
        self.shift(-(self.days as i64))
    }
}
