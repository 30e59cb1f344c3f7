// Recurrence module
// Recurrence rules as carried by event definitions. Expansion into dated
// instances is done by the persistence API; this side only needs to know
// whether a rule is present and which frequency it names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker the API and form layer use for "does not repeat".
pub const DOES_NOT_REPEAT: &str = "DNR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn all() -> [Frequency; 4] {
        [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ]
    }

    pub fn as_rrule(&self) -> &'static str {
        match self {
            Frequency::Daily => "FREQ=DAILY",
            Frequency::Weekly => "FREQ=WEEKLY",
            Frequency::Monthly => "FREQ=MONTHLY",
            Frequency::Yearly => "FREQ=YEARLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    fn detect(rule: &str) -> Option<Self> {
        let upper = rule.to_ascii_uppercase();
        let value = upper
            .split(';')
            .find_map(|part| part.trim().strip_prefix("FREQ="))?;
        match value {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// A recurrence rule string (`FREQ=WEEKLY`, possibly with extra RRULE parts).
///
/// The raw text is carried through unchanged so that the API receives exactly
/// what it produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecurrenceRule(String);

impl RecurrenceRule {
    /// Returns `None` for an empty rule or the "does not repeat" marker.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("RRULE:").unwrap_or(trimmed);
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(DOES_NOT_REPEAT) {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn from_frequency(frequency: Frequency) -> Self {
        Self(frequency.as_rrule().to_string())
    }

    pub fn frequency(&self) -> Option<Frequency> {
        Frequency::detect(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Frequency> for RecurrenceRule {
    fn from(frequency: Frequency) -> Self {
        Self::from_frequency(frequency)
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Deserialize an optional rule, mapping `null`, `""` and `"DNR"` to `None`.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<RecurrenceRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(RecurrenceRule::parse))
}
