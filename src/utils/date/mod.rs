// Date utility functions
// Week arithmetic shared by the grid window and occurrence projection

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    date - Duration::days(day_of_week(date, first_day) as i64)
}

/// Position of `date` within its week, 0 being `first_day`.
pub fn day_of_week(date: NaiveDate, first_day: Weekday) -> u8 {
    let offset = date.weekday().num_days_from_monday() as i32
        - first_day.num_days_from_monday() as i32;
    offset.rem_euclid(7) as u8
}

pub fn is_same_week(a: NaiveDate, b: NaiveDate, first_day: Weekday) -> bool {
    week_start(a, first_day) == week_start(b, first_day)
}

/// Shift by a signed number of calendar days.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}
