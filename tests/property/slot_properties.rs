// Property tests for the half-hour slot codec
// Every grid position must survive conversion to a wall time and back

use chrono::FixedOffset;
use proptest::prelude::*;

use slotgrid::utils::slot::{duration_in_slots, Slot, SlotKey, WallTime};

fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    // Whole quarter hours between -12:00 and +14:00.
    (-48i32..=56).prop_map(|quarters| FixedOffset::east_opt(quarters * 900).unwrap())
}

proptest! {
    /// Property: slot -> wall time -> slot is the identity for every offset
    #[test]
    fn prop_slot_round_trip(index in 0u32..48, offset in offset_strategy()) {
        let slot = Slot::new(index).unwrap();
        let wall = slot.to_wall_time(offset);
        prop_assert_eq!(Slot::from_time(wall.time()).unwrap(), slot);

        // The rendered string parses back to the same wall time.
        let reparsed: WallTime = wall.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, wall);
    }

    /// Property: grid keys survive formatting and parsing
    #[test]
    fn prop_slot_key_round_trip(day in 0u32..21, index in 0u32..48) {
        let key = SlotKey::new(day, Slot::new(index).unwrap());
        prop_assert_eq!(key.to_string().parse::<SlotKey>().unwrap(), key);
    }

    /// Property: a range of whole slots measures exactly that many slots
    #[test]
    fn prop_duration_of_whole_slots(start in 0u32..47, length in 1u32..48) {
        prop_assume!(start + length < 48);
        let from = Slot::new(start).unwrap().start_time();
        let to = Slot::new(start + length).unwrap().start_time();
        prop_assert_eq!(duration_in_slots(from, to).unwrap() as u32, length);
    }

    /// Property: floor and ceil bracket any time of day
    #[test]
    fn prop_floor_le_ceil(hour in 0u32..24, minute in 0u32..60) {
        let time = chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let floor = Slot::floor(time);
        let ceil = Slot::ceil(time);
        prop_assert!(floor <= ceil);
        prop_assert!(floor.start_time() <= time);
        prop_assert!(ceil.index() - floor.index() <= 1);
    }
}
