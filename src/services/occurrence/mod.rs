// Occurrence resolver
// Projects backend definitions onto the grid and resolves mutation targets

use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};

use crate::models::event::EventDefinition;
use crate::models::occurrence::{MatchKey, Occurrence, OccurrenceKey};
use crate::models::ui::GridWindow;
use crate::utils::slot::SlotKey;

/// Turns definitions into occurrences and finds the ones a gesture addresses.
///
/// Recurring definitions arrive from the event API already expanded into one
/// record per date, so expansion here is only a window filter.
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceResolver {
    week_start: Weekday,
}

impl Default for OccurrenceResolver {
    fn default() -> Self {
        Self::new(Weekday::Mon)
    }
}

impl OccurrenceResolver {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn project(&self, definition: EventDefinition) -> Occurrence {
        Occurrence::project(definition, self.week_start)
    }

    /// Project every definition, sorted by date then start slot.
    pub fn project_all(&self, definitions: Vec<EventDefinition>) -> Vec<Occurrence> {
        let mut occurrences: Vec<Occurrence> =
            definitions.into_iter().map(|d| self.project(d)).collect();
        sort_for_display(&mut occurrences);
        occurrences
    }

    /// Occurrences falling inside `window`.
    pub fn expand(&self, definitions: &[EventDefinition], window: &GridWindow) -> Vec<Occurrence> {
        let mut occurrences: Vec<Occurrence> = definitions
            .iter()
            .filter(|d| window.contains(d.date))
            .map(|d| self.project(d.clone()))
            .collect();
        sort_for_display(&mut occurrences);
        occurrences
    }
}

/// Order used by the agenda and the grid: date, start slot, then id.
pub fn sort_for_display(occurrences: &mut [Occurrence]) {
    occurrences.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then(a.start_slot.cmp(&b.start_slot))
            .then(a.id().cmp(&b.id()))
    });
}

/// First occurrence the key addresses. `None` means the local state is stale.
pub fn find<'a>(occurrences: &'a [Occurrence], key: &MatchKey) -> Option<&'a Occurrence> {
    occurrences.iter().find(|occ| key.matches(&occ.event))
}

pub fn position(occurrences: &[Occurrence], key: &MatchKey) -> Option<usize> {
    occurrences.iter().position(|occ| key.matches(&occ.event))
}

pub fn on_date(occurrences: &[Occurrence], date: NaiveDate) -> Vec<&Occurrence> {
    occurrences.iter().filter(|occ| occ.date() == date).collect()
}

/// Occurrences starting in the grid cell `key` of `window`.
pub fn in_cell<'a>(
    occurrences: &'a [Occurrence],
    window: &GridWindow,
    key: SlotKey,
) -> Vec<&'a Occurrence> {
    let Some(date) = window
        .date_for_column(key.day)
        .filter(|date| window.contains(*date))
    else {
        return Vec::new();
    };
    occurrences
        .iter()
        .filter(|occ| occ.date() == date && occ.start_slot == key.slot)
        .collect()
}

/// Identity lookup for detail views, keyed the way the renderer addresses
/// occurrences.
pub fn index_by_key(occurrences: &[Occurrence]) -> HashMap<OccurrenceKey, &Occurrence> {
    occurrences.iter().map(|occ| (occ.key(), occ)).collect()
}
