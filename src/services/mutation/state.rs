use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::event::EventId;
use crate::models::occurrence::Occurrence;

/// Shared handle to the occurrence collection.
///
/// Readers take snapshots; writers swap in a whole new collection, so a
/// reader never sees a half-applied change. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct EventsHandle {
    inner: Rc<RefCell<Rc<Vec<Occurrence>>>>,
}

impl EventsHandle {
    pub fn new(occurrences: Vec<Occurrence>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Rc::new(occurrences))),
        }
    }

    /// Current collection. Cheap; later writes do not affect it.
    pub fn snapshot(&self) -> Rc<Vec<Occurrence>> {
        Rc::clone(&self.inner.borrow())
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub(crate) fn replace(&self, occurrences: Vec<Occurrence>) {
        self.restore(Rc::new(occurrences));
    }

    /// Put back a collection taken with [`EventsHandle::snapshot`].
    pub(crate) fn restore(&self, snapshot: Rc<Vec<Occurrence>>) {
        *self.inner.borrow_mut() = snapshot;
    }

    /// Build the next collection from the current one and swap it in.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Vec<Occurrence>) -> R) -> R {
        let mut next = self.snapshot().as_ref().clone();
        let result = f(&mut next);
        self.replace(next);
        result
    }
}

/// Source of temporary ids for events the API has not stored yet.
///
/// Ids are the negated wall-clock milliseconds, forced strictly decreasing
/// so two creates in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct ProvisionalIds {
    last: Cell<Option<i64>>,
}

impl ProvisionalIds {
    pub fn next(&self, now_ms: i64) -> EventId {
        let candidate = -now_ms.max(1);
        let id = match self.last.get() {
            Some(last) if candidate >= last => last - 1,
            _ => candidate,
        };
        self.last.set(Some(id));
        EventId(id)
    }
}
