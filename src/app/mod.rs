//! App facade.
//!
//! # Data Flow
//! ```text
//! AppBuilder (builder.rs)
//!     → validate + compile RouteTable + resolve container + pick history
//!     → App { Coordinator }
//!
//! App::start(match_current)
//!     → driver task + history listener
//!     → [initial navigation to history.location()]
//!     → returns: the app is ready
//! ```
//!
//! # Design Decisions
//! - No global instance: each App owns its coordinator, container and controller
//! - Dropping the app stops it

pub mod builder;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::AppError;
use crate::history::History;
use crate::navigation::{ControllerHandle, Coordinator, NavigationEvent, NavigationOutcome, NavigationState};
use crate::routing::RouteTable;
use crate::view::Container;

pub use builder::AppBuilder;

/// A router bound to one container.
pub struct App {
    coordinator: Coordinator,
}

impl App {
    pub(crate) fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Start listening to history.
    ///
    /// With `match_current_location`, the current location is matched and
    /// rendered first, and its failure (if any) is returned. Returning `Ok`
    /// means the app is ready.
    pub async fn start(&self, match_current_location: bool) -> Result<(), AppError> {
        self.coordinator.start(match_current_location).await
    }

    /// Destroy the mounted controller and stop listening. Idempotent.
    pub fn stop(&self) {
        self.coordinator.stop();
    }

    /// The history driving this app.
    pub fn history(&self) -> &Arc<dyn History> {
        self.coordinator.history()
    }

    /// Force a re-render of the mounted controller.
    pub fn render(&self) -> bool {
        self.coordinator.render()
    }

    /// Receive an event for every navigation that was not superseded.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.coordinator.subscribe()
    }

    /// Push `path` and wait until its navigation finishes.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome, AppError> {
        self.coordinator.navigate(path).await
    }

    pub fn controller(&self) -> Option<ControllerHandle> {
        self.coordinator.controller()
    }

    pub fn state(&self) -> NavigationState {
        self.coordinator.state()
    }

    pub fn container(&self) -> &Arc<dyn Container> {
        self.coordinator.container()
    }

    pub fn routes(&self) -> &RouteTable {
        self.coordinator.routes()
    }

    pub fn is_started(&self) -> bool {
        self.coordinator.is_started()
    }

    pub fn is_stopped(&self) -> bool {
        self.coordinator.is_stopped()
    }
}
