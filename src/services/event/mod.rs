//! Event persistence boundary.
//!
//! The scheduling core never stores events itself; it talks to a remote
//! event API through [`EventStore`]. The API owns id assignment and expands
//! recurring definitions into dated instances.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use crate::models::event::{EditIntent, EventDefinition, EventDraft, EventId};

mod http;

pub use http::HttpEventStore;

/// Bearer credential for the event API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Failure reported by the event API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: Some(detail.into()),
        }
    }

    /// Human-readable message from the server, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Operations the scheduling core needs from the event API.
///
/// Futures are awaited on a single cooperative thread, so implementations
/// need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait EventStore {
    /// Store a new definition and return it with its assigned id.
    async fn create_event(
        &self,
        draft: &EventDraft,
        token: &AccessToken,
    ) -> Result<EventDefinition, StoreError>;

    /// All events for the user, recurring definitions already expanded.
    async fn list_events(&self, token: &AccessToken) -> Result<Vec<EventDefinition>, StoreError>;

    async fn edit_event(
        &self,
        intent: &EditIntent,
        token: &AccessToken,
    ) -> Result<EventDefinition, StoreError>;

    /// Delete a definition, or only the occurrence on `occurrence_date` when
    /// one is given.
    async fn delete_event(
        &self,
        id: EventId,
        occurrence_date: Option<NaiveDate>,
        token: &AccessToken,
    ) -> Result<(), StoreError>;
}
