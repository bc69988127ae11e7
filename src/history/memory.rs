//! In-memory history stack.
//!
//! # Responsibilities
//! - Keep an entry stack with a cursor (push truncates forward entries)
//! - Notify listeners synchronously on push, replace and back
//! - Render hrefs for hash or browser mode
//!
//! # Design Decisions
//! - Listeners are called outside the entry lock, so a listener may navigate
//! - Hash mode does not stack a second entry for the current path, but
//!   listeners are still notified

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::HistoryType;
use crate::history::location::{Action, Location, LocationKey};
use crate::history::{History, HistoryError, Listener, ListenerId};

struct Entries {
    stack: Vec<Location>,
    index: usize,
    next_key: u64,
}

impl Entries {
    fn issue_key(&mut self) -> LocationKey {
        let key = LocationKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn current(&self) -> &Location {
        &self.stack[self.index]
    }
}

/// History backed by an in-memory stack.
pub struct MemoryHistory {
    kind: HistoryType,
    entries: Mutex<Entries>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl MemoryHistory {
    /// Create a history positioned at `/`.
    pub fn new(kind: HistoryType) -> Self {
        Self::from_location(kind, Location::root(LocationKey(0)))
    }

    /// Create a history positioned at `path`.
    pub fn with_initial(kind: HistoryType, path: &str) -> Result<Self, HistoryError> {
        let location = Location::parse(path, Action::Pop, LocationKey(0))?;
        Ok(Self::from_location(kind, location))
    }

    fn from_location(kind: HistoryType, location: Location) -> Self {
        Self {
            kind,
            entries: Mutex::new(Entries {
                stack: vec![location],
                index: 0,
                next_key: 1,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Snapshot of the entry stack, oldest first.
    pub fn entries(&self) -> Vec<Location> {
        self.lock_entries().stack.clone()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn lock_entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, location: &Location) {
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(location);
        }
    }
}

impl History for MemoryHistory {
    fn kind(&self) -> HistoryType {
        self.kind
    }

    fn location(&self) -> Location {
        self.lock_entries().current().clone()
    }

    fn push(&self, path: &str) -> Result<(), HistoryError> {
        let location = {
            let mut entries = self.lock_entries();
            let key = entries.issue_key();
            let location = Location::parse(path, Action::Push, key)?;

            if self.kind == HistoryType::Hash && entries.current().path() == location.path() {
                tracing::debug!(
                    path = %location.path(),
                    "Hash history cannot push the same path; a new entry will not be added"
                );
                let index = entries.index;
                entries.stack[index] = location.clone();
            } else {
                let next = entries.index + 1;
                entries.stack.truncate(next);
                entries.stack.push(location.clone());
                entries.index = next;
            }
            location
        };

        self.notify(&location);
        Ok(())
    }

    fn replace(&self, path: &str) -> Result<(), HistoryError> {
        let location = {
            let mut entries = self.lock_entries();
            let key = entries.issue_key();
            let location = Location::parse(path, Action::Replace, key)?;
            let index = entries.index;
            entries.stack[index] = location.clone();
            location
        };

        self.notify(&location);
        Ok(())
    }

    fn back(&self) -> bool {
        let location = {
            let mut entries = self.lock_entries();
            if entries.index == 0 {
                return false;
            }
            entries.index -= 1;
            let index = entries.index;
            entries.stack[index].action = Action::Pop;
            entries.current().clone()
        };

        self.notify(&location);
        true
    }

    fn listen(&self, listener: Listener) -> ListenerId {
        let id = ListenerId::new(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, listener));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.lock_listeners().retain(|(existing, _)| *existing != id);
    }
}
