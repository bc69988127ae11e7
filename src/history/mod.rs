//! History abstraction.
//!
//! # Data Flow
//! ```text
//! push(path) / replace(path) / back()
//!     → memory.rs (update entry stack)
//!     → location.rs (parse pathname, search, hash, query)
//!     → listeners notified synchronously with the new Location
//!     → coordinator queues a navigation
//! ```
//!
//! # Design Decisions
//! - The coordinator only depends on the `History` trait
//! - Hash and browser flavours differ only in href rendering and same-path pushes
//! - Listeners must be cheap; the coordinator's listener just enqueues

pub mod location;
pub mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::config::HistoryType;

pub use location::{Action, Location, LocationKey};
pub use memory::MemoryHistory;

/// Callback invoked with every new location.
pub type Listener = Arc<dyn Fn(&Location) + Send + Sync>;

/// Handle returned by [`History::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Error type for history operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("invalid path `{path}`: {source}")]
    InvalidPath {
        path: String,
        source: url::ParseError,
    },
}

/// Navigation history consumed by the coordinator.
///
/// Implementations must call listeners synchronously from `push`, `replace`
/// and `back`, after their own state reflects the new location.
pub trait History: Send + Sync {
    /// Which flavour this history is.
    fn kind(&self) -> HistoryType;

    /// The current location.
    fn location(&self) -> Location;

    /// Add a new entry and navigate to it.
    fn push(&self, path: &str) -> Result<(), HistoryError>;

    /// Replace the current entry.
    fn replace(&self, path: &str) -> Result<(), HistoryError>;

    /// Go one entry back. Returns false when already at the first entry.
    fn back(&self) -> bool;

    /// Register a listener for location changes.
    fn listen(&self, listener: Listener) -> ListenerId;

    /// Remove a listener.
    fn unlisten(&self, id: ListenerId);

    /// Render a location as an href for this flavour.
    fn create_href(&self, location: &Location) -> String {
        match self.kind() {
            HistoryType::Hash => format!("#{}", location.path()),
            HistoryType::Browser => location.path(),
        }
    }
}

/// Create the default history for a flavour.
pub fn create_history(kind: HistoryType) -> Arc<dyn History> {
    Arc::new(MemoryHistory::new(kind))
}
