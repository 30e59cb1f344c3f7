// Settings module
// User configuration for the scheduling core and the API client

use chrono::{FixedOffset, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::event::is_valid_hex_colour;
use crate::utils::slot::{parse_offset, SLOTS_PER_DAY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub access_token: Option<String>,
    /// Fixed UTC offset attached to every time the grid produces.
    pub utc_offset: String,
    pub week_start: Weekday,
    pub default_colour: String,
    /// Length of an event created by clicking an empty cell.
    pub default_event_slots: u8,
    pub toast_duration_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            access_token: None,
            utc_offset: "+01:00".to_string(),
            week_start: Weekday::Mon,
            default_colour: "#8D85D2".to_string(),
            default_event_slots: 2,
            toast_duration_secs: 3,
            request_timeout_secs: 20,
        }
    }
}

impl Settings {
    /// Parsed `utc_offset`; falls back to UTC when unparsable.
    pub fn offset(&self) -> FixedOffset {
        parse_offset(&self.utc_offset).unwrap_or_else(|| {
            log::warn!("Invalid utc_offset '{}', using +00:00", self.utc_offset);
            Utc.fix()
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.trim().is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }
        if parse_offset(&self.utc_offset).is_none() {
            return Err(format!(
                "UTC offset '{}' must look like +01:00",
                self.utc_offset
            ));
        }
        if !is_valid_hex_colour(&self.default_colour) {
            return Err("Default colour must be in hex format (#RRGGBB or #RGB)".to_string());
        }
        if self.default_event_slots == 0 || self.default_event_slots >= SLOTS_PER_DAY {
            return Err("Default event length must be between 1 and 47 slots".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be at least one second".to_string());
        }
        Ok(())
    }
}
