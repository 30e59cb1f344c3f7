//! Optimistic mutation engine.
//!
//! Every create, edit and delete is applied to the local occurrence
//! collection before the event API is called, then either reconciled with the
//! API's answer or rolled back to the snapshot taken just before the change.
//!
//! Mutations are not queued. A second mutation issued while the first is in
//! flight sees the first's optimistic state, and each one reconciles against
//! whatever the collection holds when its own answer arrives, so the last
//! response wins.

mod state;

pub use state::{EventsHandle, ProvisionalIds};

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use thiserror::Error;

use crate::models::event::{EditIntent, EventDefinition, EventDraft, EventValidationError};
use crate::models::occurrence::{MatchKey, Occurrence};
use crate::models::settings::Settings;
use crate::models::ui::GridWindow;
use crate::services::event::{AccessToken, EventStore, StoreError};
use crate::services::notification::{Toast, ToastManager};
use crate::services::occurrence::{self, OccurrenceResolver};
use crate::services::reschedule::{self, DropMode, DropOutcome, ScheduleError};
use crate::utils::slot::SlotKey;

pub const MSG_AUTH_REQUIRED: &str = "Authentication required";
pub const MSG_CREATED: &str = "Event was created";
pub const MSG_EDITED: &str = "Event was edited";
pub const MSG_DELETED: &str = "Event was deleted";
pub const MSG_NOT_CREATED: &str = "Event was not created";
pub const MSG_NOT_EDITED: &str = "Event was not edited";
pub const MSG_NOT_DELETED: &str = "Event was not deleted";
pub const MSG_NOT_LOADED: &str = "Events could not be loaded";
pub const MSG_NOT_REFRESHED: &str = "Event was created but the calendar could not be refreshed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Bad input; shown next to the field, never as a toast.
    #[error("{0}")]
    Validation(#[from] EventValidationError),
    #[error("no occurrence matches {0}")]
    OccurrenceNotFound(MatchKey),
    #[error("event API call failed: {0}")]
    Persistence(#[from] StoreError),
    #[error("authentication required")]
    AuthRequired,
    #[error("cannot reschedule: {0}")]
    Schedule(#[from] ScheduleError),
}

/// Owner of the occurrence collection and the only writer to it.
///
/// Methods take `&self` and keep no borrow across an `.await`, so several
/// mutations can be in flight on one thread at once.
pub struct MutationEngine<S> {
    store: S,
    events: EventsHandle,
    resolver: OccurrenceResolver,
    toasts: RefCell<ToastManager>,
    token: RefCell<Option<AccessToken>>,
    ids: ProvisionalIds,
    clock: Box<dyn Fn() -> i64>,
    offset: FixedOffset,
    default_colour: String,
}

impl<S: EventStore> MutationEngine<S> {
    pub fn new(store: S, settings: &Settings) -> Self {
        Self {
            store,
            events: EventsHandle::default(),
            resolver: OccurrenceResolver::new(settings.week_start),
            toasts: RefCell::new(ToastManager::new(Duration::from_secs(
                settings.toast_duration_secs,
            ))),
            token: RefCell::new(settings.access_token.clone().map(AccessToken::new)),
            ids: ProvisionalIds::default(),
            clock: Box::new(|| Utc::now().timestamp_millis()),
            offset: settings.offset(),
            default_colour: settings.default_colour.clone(),
        }
    }

    /// Replace the millisecond clock used for provisional ids.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Seed the collection without calling the API.
    pub fn with_events(self, definitions: Vec<EventDefinition>) -> Self {
        self.events.replace(self.resolver.project_all(definitions));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolver(&self) -> &OccurrenceResolver {
        &self.resolver
    }

    /// Read handle for renderers.
    pub fn handle(&self) -> EventsHandle {
        self.events.clone()
    }

    pub fn snapshot(&self) -> Rc<Vec<Occurrence>> {
        self.events.snapshot()
    }

    /// Occurrences inside `window`, in display order.
    pub fn visible(&self, window: &GridWindow) -> Vec<Occurrence> {
        self.snapshot()
            .iter()
            .filter(|occ| window.contains(occ.date()))
            .cloned()
            .collect()
    }

    pub fn set_access_token(&self, token: Option<AccessToken>) {
        *self.token.borrow_mut() = token;
    }

    pub fn toasts(&self) -> Ref<'_, ToastManager> {
        self.toasts.borrow()
    }

    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.toasts.borrow_mut().drain()
    }

    fn require_token(&self) -> Result<AccessToken, MutationError> {
        let token = self.token.borrow().clone();
        token.ok_or_else(|| {
            log::warn!("Mutation refused: no access token");
            self.toasts.borrow_mut().error(MSG_AUTH_REQUIRED);
            MutationError::AuthRequired
        })
    }

    fn roll_back(&self, snapshot: Rc<Vec<Occurrence>>, err: &StoreError, fallback: &str) {
        log::warn!("Rolling back optimistic change: {}", err);
        self.events.restore(snapshot);
        let message = err.detail().unwrap_or(fallback);
        self.toasts.borrow_mut().error(message);
    }

    /// Authoritative refresh: replace the whole collection with the API's list.
    pub async fn load(&self) -> Result<usize, MutationError> {
        let token = self.require_token()?;
        match self.store.list_events(&token).await {
            Ok(definitions) => {
                let occurrences = self.resolver.project_all(definitions);
                let count = occurrences.len();
                self.events.replace(occurrences);
                log::info!("Loaded {} occurrences", count);
                Ok(count)
            }
            Err(err) => {
                log::error!("Failed to load events: {}", err);
                let message = err.detail().unwrap_or(MSG_NOT_LOADED).to_string();
                self.toasts.borrow_mut().error(message);
                Err(err.into())
            }
        }
    }

    pub async fn create(&self, draft: &EventDraft) -> Result<EventDefinition, MutationError> {
        draft.validate()?;
        let token = self.require_token()?;

        let snapshot = self.events.snapshot();
        let temp_id = self.ids.next((self.clock)());
        let provisional = self
            .resolver
            .project(draft.to_provisional(temp_id, &self.default_colour));
        log::debug!("Applying provisional create {}", provisional.key());
        self.events.update(|occs| occs.push(provisional));

        let created = match self.store.create_event(draft, &token).await {
            Ok(created) => created,
            Err(err) => {
                self.roll_back(snapshot, &err, MSG_NOT_CREATED);
                return Err(err.into());
            }
        };

        let stored = self.resolver.project(created.clone());
        let replaced = self.events.update(|occs| {
            match occs.iter_mut().find(|occ| occ.id() == temp_id) {
                Some(occ) => {
                    *occ = stored;
                    true
                }
                None => false,
            }
        });
        if !replaced {
            log::debug!("Provisional event {} was gone when create answered", temp_id);
        }

        // One create can materialise a whole series; only the API can expand it.
        if draft.is_recurring() {
            match self.store.list_events(&token).await {
                Ok(definitions) => self.events.replace(self.resolver.project_all(definitions)),
                Err(err) => {
                    log::warn!("Refresh after recurring create failed: {}", err);
                    self.toasts.borrow_mut().warning(MSG_NOT_REFRESHED);
                }
            }
        }

        log::info!("Created event {} '{}'", created.id, created.title);
        self.toasts.borrow_mut().success(MSG_CREATED);
        Ok(created)
    }

    pub async fn edit(&self, intent: &EditIntent) -> Result<EventDefinition, MutationError> {
        intent.validate()?;
        let token = self.require_token()?;

        let snapshot = self.events.snapshot();
        let target = MatchKey::new(intent.id, intent.target_date(), intent.target_start());
        let Some(existing) = occurrence::find(&snapshot, &target) else {
            log::warn!("Edit target {} not found in local state", target);
            self.toasts.borrow_mut().error(MSG_NOT_EDITED);
            return Err(MutationError::OccurrenceNotFound(target));
        };

        let provisional = self.resolver.project(intent.apply_to(&existing.event));
        let provisional_key = provisional.match_key();
        log::debug!("Applying provisional edit of {}", target);
        self.events.update(|occs| {
            for occ in occs.iter_mut().filter(|occ| target.matches(&occ.event)) {
                *occ = provisional.clone();
            }
        });

        let updated = match self.store.edit_event(intent, &token).await {
            Ok(updated) => updated,
            Err(err) => {
                self.roll_back(snapshot, &err, MSG_NOT_EDITED);
                return Err(err.into());
            }
        };

        let stored = self.resolver.project(updated.clone());
        let replaced = self.events.update(|occs| {
            let mut replaced = false;
            for occ in occs.iter_mut().filter(|occ| provisional_key.matches(&occ.event)) {
                *occ = stored.clone();
                replaced = true;
            }
            replaced
        });
        if !replaced {
            log::debug!("Provisional edit {} was gone when edit answered", provisional_key);
        }

        log::info!("Edited event {}", updated.id);
        self.toasts.borrow_mut().success(MSG_EDITED);
        Ok(updated)
    }

    /// Delete `target`. A series member is removed for its date only; any
    /// other event is deleted outright.
    pub async fn delete(&self, target: &Occurrence) -> Result<(), MutationError> {
        let token = self.require_token()?;

        let snapshot = self.events.snapshot();
        let key = target.match_key();
        if occurrence::find(&snapshot, &key).is_none() {
            log::warn!("Delete target {} not found in local state", key);
            self.toasts.borrow_mut().error(MSG_NOT_DELETED);
            return Err(MutationError::OccurrenceNotFound(key));
        }

        log::debug!("Applying provisional delete of {}", key);
        self.events
            .update(|occs| occs.retain(|occ| !key.matches(&occ.event)));

        let occurrence_date = target.is_repeated().then(|| target.date());
        if let Err(err) = self
            .store
            .delete_event(target.id(), occurrence_date, &token)
            .await
        {
            self.roll_back(snapshot, &err, MSG_NOT_DELETED);
            return Err(err.into());
        }

        log::info!("Deleted {}", key);
        self.toasts.borrow_mut().success(MSG_DELETED);
        Ok(())
    }

    /// Apply a drag-and-drop of `occ` onto cell `dest`.
    ///
    /// Returns `None` when the drop changed nothing.
    pub async fn drop_on(
        &self,
        occ: &Occurrence,
        dest: SlotKey,
        mode: DropMode,
        window: Option<&GridWindow>,
    ) -> Result<Option<EventDefinition>, MutationError> {
        let outcome = match reschedule::reschedule(occ, dest, mode, window, self.offset) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("Drop of {} on {} rejected: {}", occ.key(), dest, err);
                self.toasts.borrow_mut().error(err.to_string());
                return Err(err.into());
            }
        };

        match outcome {
            DropOutcome::Unchanged => Ok(None),
            DropOutcome::Move(intent) => self.edit(&intent).await.map(Some),
            DropOutcome::Copy(draft) => self.create(&draft).await.map(Some),
        }
    }
}
