// Test fixtures - reusable test data
// Sample events and an in-memory event API with failure injection

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use chrono::{Duration, NaiveDate};
use tokio::sync::oneshot;

use slotgrid::models::event::{EditIntent, EventDefinition, EventDraft, EventId};
use slotgrid::models::occurrence::MatchKey;
use slotgrid::models::recurrence::{Frequency, RecurrenceRule};
use slotgrid::models::settings::Settings;
use slotgrid::services::event::{AccessToken, EventStore, StoreError};
use slotgrid::utils::slot::WallTime;

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Monday 2025-01-06
    pub fn monday_jan_6() -> NaiveDate {
        ymd(2025, 1, 6)
    }

    /// Monday 2025-03-10, first date of the weekly standup series
    pub fn standup_first() -> NaiveDate {
        ymd(2025, 3, 10)
    }
}

pub fn time(raw: &str) -> WallTime {
    raw.parse().unwrap()
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn single(id: i64, date: NaiveDate, start: &str, end: &str) -> EventDefinition {
        EventDefinition {
            id: EventId(id),
            title: format!("Event {}", id),
            description: None,
            location: None,
            date,
            start_time: time(start),
            end_time: time(end),
            colour: Some("#3B82F6".to_string()),
            rrule: None,
            repeated: false,
        }
    }

    /// Event 42 on Monday 2025-01-06, 09:00-10:00 (slots 18-20).
    pub fn review_42() -> EventDefinition {
        EventDefinition {
            title: "Design review".to_string(),
            ..single(42, dates::monday_jan_6(), "09:00:00+01:00", "10:00:00+01:00")
        }
    }

    /// Weekly standup, id 7, expanded over `weeks` Mondays from 2025-03-10.
    pub fn weekly_standup(weeks: i64) -> Vec<EventDefinition> {
        (0..weeks)
            .map(|week| EventDefinition {
                id: EventId(7),
                title: "Standup".to_string(),
                description: Some("Daily sync".to_string()),
                location: None,
                date: dates::standup_first() + Duration::weeks(week),
                start_time: time("09:00:00+01:00"),
                end_time: time("09:30:00+01:00"),
                colour: Some("#10B981".to_string()),
                rrule: Some(RecurrenceRule::from(Frequency::Weekly)),
                repeated: true,
            })
            .collect()
    }
}

pub fn settings() -> Settings {
    Settings {
        access_token: Some("test-token".to_string()),
        ..Settings::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    List,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    List,
    Edit {
        id: EventId,
        previous_date: Option<NaiveDate>,
    },
    Delete {
        id: EventId,
        date: Option<NaiveDate>,
    },
}

/// In-memory event API.
///
/// Keeps its own copy of the stored events, records every call, and can be
/// told to fail or to hold an edit until the test releases it.
pub struct FakeStore {
    events: RefCell<Vec<EventDefinition>>,
    next_id: Cell<i64>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<(Op, StoreError)>>,
    gates: RefCell<Vec<(Op, oneshot::Receiver<()>)>>,
    /// Number of instances a recurring create materialises.
    pub series_length: i64,
}

impl FakeStore {
    pub fn new(events: Vec<EventDefinition>) -> Self {
        Self {
            events: RefCell::new(events),
            next_id: Cell::new(100),
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(Vec::new()),
            gates: RefCell::new(Vec::new()),
            series_length: 4,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Make the next call of kind `op` fail with `err`.
    pub fn fail_next(&self, op: Op, err: StoreError) {
        self.failures.borrow_mut().push((op, err));
    }

    /// Hold the next call of kind `op` until the returned sender fires.
    /// Gates for the same kind are released to calls in FIFO order.
    pub fn hold_next(&self, op: Op) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push((op, rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn stored(&self) -> Vec<EventDefinition> {
        self.events.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn injected(&self, op: Op) -> Result<(), StoreError> {
        let mut failures = self.failures.borrow_mut();
        match failures.iter().position(|(o, _)| *o == op) {
            Some(index) => Err(failures.remove(index).1),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self, op: Op) {
        let gate = {
            let mut gates = self.gates.borrow_mut();
            gates
                .iter()
                .position(|(o, _)| *o == op)
                .map(|index| gates.remove(index).1)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn allocate_id(&self) -> EventId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        EventId(id)
    }
}

impl EventStore for FakeStore {
    async fn create_event(
        &self,
        draft: &EventDraft,
        _token: &AccessToken,
    ) -> Result<EventDefinition, StoreError> {
        self.record(Call::Create(draft.title.clone()));
        self.pass_gate(Op::Create).await;
        self.injected(Op::Create)?;

        let stored = draft.to_provisional(self.allocate_id(), "#8D85D2");
        if draft.is_recurring() {
            let mut events = self.events.borrow_mut();
            for week in 0..self.series_length {
                events.push(EventDefinition {
                    date: stored.date + Duration::weeks(week),
                    ..stored.clone()
                });
            }
        } else {
            self.events.borrow_mut().push(stored.clone());
        }
        Ok(stored)
    }

    async fn list_events(&self, _token: &AccessToken) -> Result<Vec<EventDefinition>, StoreError> {
        self.record(Call::List);
        self.pass_gate(Op::List).await;
        self.injected(Op::List)?;
        Ok(self.stored())
    }

    async fn edit_event(
        &self,
        intent: &EditIntent,
        _token: &AccessToken,
    ) -> Result<EventDefinition, StoreError> {
        self.record(Call::Edit {
            id: intent.id,
            previous_date: intent.previous_date,
        });
        self.pass_gate(Op::Edit).await;
        self.injected(Op::Edit)?;

        let target = MatchKey::new(intent.id, intent.target_date(), intent.target_start());
        let mut events = self.events.borrow_mut();
        let existing = events
            .iter_mut()
            .find(|e| target.matches(e))
            .ok_or_else(|| StoreError::rejected(404, "Event not found"))?;
        *existing = intent.apply_to(existing);
        Ok(existing.clone())
    }

    async fn delete_event(
        &self,
        id: EventId,
        occurrence_date: Option<NaiveDate>,
        _token: &AccessToken,
    ) -> Result<(), StoreError> {
        self.record(Call::Delete {
            id,
            date: occurrence_date,
        });
        self.pass_gate(Op::Delete).await;
        self.injected(Op::Delete)?;

        self.events
            .borrow_mut()
            .retain(|e| e.id != id || occurrence_date.is_some_and(|d| e.date != d));
        Ok(())
    }
}
