//! Payloads sent to the persistence API for create and edit.
//!
//! Optional fields are omitted from the serialized body when absent (or, for
//! free text, blank) so the API applies its own defaults.

use chrono::NaiveDate;
use serde::Serialize;

use super::{validate_fields, EventDefinition, EventFields, EventId, EventValidationError};
use crate::models::recurrence::RecurrenceRule;
use crate::utils::slot::WallTime;

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// A new event as entered by the user, before the API assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub location: Option<String>,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<RecurrenceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: WallTime,
        end_time: WallTime,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            date,
            start_time,
            end_time,
            rrule: None,
            colour: None,
        }
    }

    /// Copy of an existing event's presentation fields at a new position.
    /// The copy has no link to the original's id or series.
    pub fn copy_of(
        event: &EventDefinition,
        date: NaiveDate,
        start_time: WallTime,
        end_time: WallTime,
    ) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date,
            start_time,
            end_time,
            rrule: None,
            colour: event.colour.clone(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    pub fn rrule(mut self, rule: impl Into<RecurrenceRule>) -> Self {
        self.rrule = Some(rule.into());
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }

    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&EventFields {
            title: &self.title,
            description: self.description.as_deref(),
            location: self.location.as_deref(),
            colour: self.colour.as_deref(),
            start: self.start_time,
            end: self.end_time,
        })
    }

    /// Local stand-in shown until the API returns the stored record.
    pub fn to_provisional(&self, id: EventId, default_colour: &str) -> EventDefinition {
        EventDefinition {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            colour: Some(
                self.colour
                    .clone()
                    .unwrap_or_else(|| default_colour.to_string()),
            ),
            rrule: self.rrule.clone(),
            repeated: self.is_recurring(),
        }
    }
}

/// New field values for an existing event.
///
/// When the `previous_*` fields are set the edit targets the single
/// occurrence that used to sit at that date and start time (an exception to
/// its series); otherwise it redefines the event as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditIntent {
    /// Sent in the request path, not the body.
    #[serde(skip)]
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub location: Option<String>,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<RecurrenceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_start_time: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_end_time: Option<WallTime>,
}

impl EditIntent {
    /// Intent that leaves `event` unchanged. Series members get their current
    /// position recorded as the previous occurrence.
    pub fn from_event(event: &EventDefinition) -> Self {
        let mut intent = Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            colour: event.colour.clone(),
            rrule: None,
            previous_date: None,
            previous_start_time: None,
            previous_end_time: None,
        };
        if event.repeated {
            intent.previous_date = Some(event.date);
            intent.previous_start_time = Some(event.start_time);
            intent.previous_end_time = Some(event.end_time);
        }
        intent
    }

    pub fn reschedule(mut self, date: NaiveDate, start_time: WallTime, end_time: WallTime) -> Self {
        self.date = date;
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn targets_single_occurrence(&self) -> bool {
        self.previous_date.is_some() || self.previous_start_time.is_some()
    }

    /// Date of the occurrence being edited.
    pub fn target_date(&self) -> NaiveDate {
        self.previous_date.unwrap_or(self.date)
    }

    /// Start time of the occurrence being edited.
    pub fn target_start(&self) -> WallTime {
        self.previous_start_time.unwrap_or(self.start_time)
    }

    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&EventFields {
            title: &self.title,
            description: self.description.as_deref(),
            location: self.location.as_deref(),
            colour: self.colour.as_deref(),
            start: self.start_time,
            end: self.end_time,
        })
    }

    /// Optimistic result of applying this intent to `existing`.
    pub fn apply_to(&self, existing: &EventDefinition) -> EventDefinition {
        EventDefinition {
            id: existing.id,
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            colour: self.colour.clone().or_else(|| existing.colour.clone()),
            rrule: self.rrule.clone().or_else(|| existing.rrule.clone()),
            repeated: existing.repeated,
        }
    }
}
