// Property tests for drag-and-drop rescheduling
// Moves keep the duration and shift the date by the column delta

use chrono::{Duration, FixedOffset, NaiveDate, Weekday};
use proptest::prelude::*;

use slotgrid::models::event::{EventDefinition, EventId};
use slotgrid::models::occurrence::Occurrence;
use slotgrid::services::reschedule::{reschedule, DropMode, DropOutcome};
use slotgrid::utils::slot::{duration_in_slots, Slot, SlotKey};

fn occurrence(date: NaiveDate, start: Slot, length: u32) -> Occurrence {
    let offset = FixedOffset::east_opt(3600).unwrap();
    let end = Slot::new(start.index() as u32 + length).unwrap();
    Occurrence::project(
        EventDefinition {
            id: EventId(42),
            title: "Focus time".to_string(),
            description: None,
            location: None,
            date,
            start_time: start.to_wall_time(offset),
            end_time: end.to_wall_time(offset),
            colour: None,
            rrule: None,
            repeated: false,
        },
        Weekday::Mon,
    )
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|days| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(days))
}

proptest! {
    /// Property: every legal destination preserves the duration in slots
    #[test]
    fn prop_move_preserves_duration(
        date in date_strategy(),
        start in 0u32..40,
        length in 1u32..8,
        dest_day in 0u32..14,
        dest_slot in 0u32..47,
    ) {
        prop_assume!(dest_slot + length <= 47);
        let occ = occurrence(date, Slot::new(start).unwrap(), length);
        let dest = SlotKey::new(dest_day, Slot::new(dest_slot).unwrap());
        let offset = FixedOffset::east_opt(3600).unwrap();

        match reschedule(&occ, dest, DropMode::Move, None, offset).unwrap() {
            DropOutcome::Unchanged => {
                prop_assert_eq!(dest, SlotKey::new(occ.day_of_week as u32, occ.start_slot));
            }
            DropOutcome::Move(intent) => {
                let moved = duration_in_slots(intent.start_time.time(), intent.end_time.time()).unwrap();
                prop_assert_eq!(moved as u32, length);
                prop_assert_eq!(Slot::from_time(intent.start_time.time()).unwrap().index() as u32, dest_slot);

                let delta = dest_day as i64 - occ.day_of_week as i64;
                prop_assert_eq!((intent.date - date).num_days(), delta);
            }
            DropOutcome::Copy(_) => prop_assert!(false, "move produced a copy"),
        }
    }

    /// Property: destinations that would run past midnight are rejected
    #[test]
    fn prop_overflowing_destination_is_rejected(start in 0u32..40, length in 1u32..8, dest_slot in 40u32..48) {
        prop_assume!(dest_slot + length > 47);
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let occ = occurrence(date, Slot::new(start).unwrap(), length);
        let dest = SlotKey::new(3, Slot::new(dest_slot).unwrap());
        let offset = FixedOffset::east_opt(3600).unwrap();

        prop_assert!(reschedule(&occ, dest, DropMode::Move, None, offset).is_err());
    }
}
