//! Drag-and-drop reschedule calculator.
//!
//! Translates a drop of an occurrence on a grid cell into the mutation it
//! implies. Dates move by the column delta in real calendar days, so a drop
//! across a week boundary lands on the right date.

use chrono::{Duration, FixedOffset, NaiveDate};
use thiserror::Error;

use crate::models::event::{EditIntent, EventDraft};
use crate::models::occurrence::Occurrence;
use crate::models::settings::Settings;
use crate::models::ui::GridWindow;
use crate::utils::slot::{Slot, SlotError, SlotKey, SLOTS_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("an event of {duration} slots cannot start at slot {start}")]
    OutOfGrid { start: Slot, duration: u8 },
    #[error("destination date is out of range")]
    DateOutOfRange,
    #[error(transparent)]
    Slot(#[from] SlotError),
}

/// Whether the modifier key was held when the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropMode {
    #[default]
    Move,
    Copy,
}

/// The mutation a drop asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped on its own cell; nothing to send.
    Unchanged,
    Move(EditIntent),
    Copy(EventDraft),
}

/// Date reached by moving from column `original_day` to `dest.day`.
pub fn new_date_from_day_slot(
    original_date: NaiveDate,
    original_day: u32,
    dest: SlotKey,
) -> Result<NaiveDate, ScheduleError> {
    let delta = dest.day as i64 - original_day as i64;
    original_date
        .checked_add_signed(Duration::days(delta))
        .ok_or(ScheduleError::DateOutOfRange)
}

/// Slot an event of `duration` slots ends on when started at `start`.
pub fn end_slot_for(start: Slot, duration: u8) -> Result<Slot, ScheduleError> {
    let end = start.index() as u32 + duration as u32;
    if end >= SLOTS_PER_DAY as u32 {
        return Err(ScheduleError::OutOfGrid { start, duration });
    }
    Ok(Slot::new(end)?)
}

/// Column the occurrence currently sits in. Without a window the column is
/// its day of week.
fn origin_day(occ: &Occurrence, window: Option<&GridWindow>) -> u32 {
    window
        .and_then(|w| w.column_of(occ.date()))
        .unwrap_or(occ.day_of_week as u32)
}

/// Grid cell the occurrence is drawn in.
pub fn origin_key(occ: &Occurrence, window: Option<&GridWindow>) -> SlotKey {
    SlotKey::new(origin_day(occ, window), occ.start_slot)
}

/// Compute the mutation for dropping `occ` on `dest`.
///
/// The duration in slots is preserved. Times are emitted with `offset`.
pub fn reschedule(
    occ: &Occurrence,
    dest: SlotKey,
    mode: DropMode,
    window: Option<&GridWindow>,
    offset: FixedOffset,
) -> Result<DropOutcome, ScheduleError> {
    let original_day = origin_day(occ, window);
    if dest == SlotKey::new(original_day, occ.start_slot) {
        log::debug!("Drop of {} on its own cell {} ignored", occ.key(), dest);
        return Ok(DropOutcome::Unchanged);
    }

    let duration = occ.duration_slots();
    let end = end_slot_for(dest.slot, duration)?;
    let date = new_date_from_day_slot(occ.date(), original_day, dest)?;
    let start_time = dest.slot.to_wall_time(offset);
    let end_time = end.to_wall_time(offset);

    Ok(match mode {
        DropMode::Move => DropOutcome::Move(
            EditIntent::from_event(&occ.event).reschedule(date, start_time, end_time),
        ),
        DropMode::Copy => {
            DropOutcome::Copy(EventDraft::copy_of(&occ.event, date, start_time, end_time))
        }
    })
}

/// Default draft for a click on the empty cell `key`.
///
/// The draft is shortened to end at 23:30 when the default length does not
/// fit. The final cell (slot 47) leaves no room for an end and is rejected
/// with [`ScheduleError::OutOfGrid`].
pub fn draft_for_cell(
    window: &GridWindow,
    key: SlotKey,
    settings: &Settings,
) -> Result<EventDraft, ScheduleError> {
    let offset = settings.offset();
    let date = window
        .date_for_column(key.day)
        .ok_or(ScheduleError::DateOutOfRange)?;
    // Clicks near midnight get a shorter event rather than none.
    let end = (key.slot.index() as u32 + settings.default_event_slots as u32)
        .min(Slot::LAST.index() as u32);
    if end <= key.slot.index() as u32 {
        return Err(ScheduleError::OutOfGrid {
            start: key.slot,
            duration: settings.default_event_slots,
        });
    }
    let end = Slot::new(end)?;
    Ok(EventDraft::new(
        "",
        date,
        key.slot.to_wall_time(offset),
        end.to_wall_time(offset),
    )
    .colour(settings.default_colour.clone()))
}
