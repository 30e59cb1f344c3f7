// Event module
// Event definitions as exchanged with the persistence API, plus the field
// validation that runs before any mutation is attempted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::recurrence::{self, RecurrenceRule};
use crate::utils::slot::WallTime;

mod draft;

pub use draft::{EditIntent, EventDraft};

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MAX_LOCATION_LEN: usize = 256;

/// Identifier of an event definition.
///
/// Ids assigned by the API are always positive; negative ids mark provisional
/// events that only exist locally until the create call answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl EventId {
    pub fn is_provisional(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored event record. For a recurring series the API returns one record
/// per dated instance, all sharing `id` and flagged `repeated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "recurrence::deserialize_optional"
    )]
    pub rrule: Option<RecurrenceRule>,
    #[serde(default)]
    pub repeated: bool,
}

impl EventDefinition {
    pub fn is_recurring(&self) -> bool {
        self.repeated || self.rrule.is_some()
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
}

/// Validation failures, each tied to the form field it should be shown next to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    TitleTooLong,
    DescriptionTooLong,
    LocationTooLong,
    InvalidColour,
    StartOffGrid,
    EndOffGrid,
    SameStartAndEnd,
    EndBeforeStart,
}

impl EventValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong => "title",
            Self::DescriptionTooLong => "description",
            Self::LocationTooLong => "location",
            Self::InvalidColour => "colour",
            Self::StartOffGrid => "start_time",
            Self::EndOffGrid | Self::SameStartAndEnd | Self::EndBeforeStart => "end_time",
        }
    }
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Event title cannot be empty"),
            Self::TitleTooLong => write!(f, "Event title must be {MAX_TITLE_LEN} characters or less"),
            Self::DescriptionTooLong => write!(
                f,
                "Description must be {MAX_DESCRIPTION_LEN} characters or less"
            ),
            Self::LocationTooLong => write!(f, "Location must be {MAX_LOCATION_LEN} characters or less"),
            Self::InvalidColour => write!(f, "Colour must be in hex format (#RRGGBB or #RGB)"),
            Self::StartOffGrid => write!(f, "Start time must be on the hour or half hour"),
            Self::EndOffGrid => write!(f, "End time must be on the hour or half hour"),
            Self::SameStartAndEnd => write!(f, "Start and end time cannot be the same"),
            Self::EndBeforeStart => write!(f, "Event end time must be after start time"),
        }
    }
}

impl std::error::Error for EventValidationError {}

pub(crate) struct EventFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub colour: Option<&'a str>,
    pub start: WallTime,
    pub end: WallTime,
}

pub(crate) fn validate_fields(fields: &EventFields<'_>) -> Result<(), EventValidationError> {
    let title = fields.title.trim();
    if title.is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(EventValidationError::TitleTooLong);
    }
    if exceeds(fields.description, MAX_DESCRIPTION_LEN) {
        return Err(EventValidationError::DescriptionTooLong);
    }
    if exceeds(fields.location, MAX_LOCATION_LEN) {
        return Err(EventValidationError::LocationTooLong);
    }
    if let Some(colour) = fields.colour {
        if !is_valid_hex_colour(colour) {
            return Err(EventValidationError::InvalidColour);
        }
    }

    if !fields.start.is_on_grid() {
        return Err(EventValidationError::StartOffGrid);
    }
    if !fields.end.is_on_grid() {
        return Err(EventValidationError::EndOffGrid);
    }
    if fields.start.time() == fields.end.time() {
        return Err(EventValidationError::SameStartAndEnd);
    }
    if fields.end.time() < fields.start.time() {
        return Err(EventValidationError::EndBeforeStart);
    }

    Ok(())
}

fn exceeds(value: Option<&str>, max: usize) -> bool {
    value.map_or(false, |v| v.trim().chars().count() > max)
}

/// `#RGB` or `#RRGGBB`.
pub fn is_valid_hex_colour(colour: &str) -> bool {
    let Some(hex) = colour.trim().strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
