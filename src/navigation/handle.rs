//! Handle to the mounted controller, for code outside the controller.

use std::sync::{Arc, Weak};

use crate::controller::ControllerContext;
use crate::history::{HistoryError, Location};
use crate::navigation::coordinator::Shared;
use crate::navigation::NavigationToken;
use crate::routing::Params;
use crate::view::Container;

/// Snapshot of a mounted controller's context plus its navigation controls.
///
/// The handle outlives the mount: once another controller is mounted,
/// `refresh_view` does nothing and `is_mounted` returns false.
///
/// Both also return false when called from inside a controller's `render`
/// or `destroy`, which run while the mounted controller is locked.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    context: ControllerContext,
    shared: Weak<Shared>,
}

impl ControllerHandle {
    pub(crate) fn new(context: ControllerContext, shared: Weak<Shared>) -> Self {
        Self { context, shared }
    }

    pub fn token(&self) -> NavigationToken {
        self.context.token()
    }

    pub fn location(&self) -> &Location {
        self.context.location()
    }

    pub fn params(&self) -> &Params {
        self.context.params()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.context.param(name)
    }

    pub fn container(&self) -> &Arc<dyn Container> {
        self.context.container()
    }

    /// Pattern source of the route this controller was mounted for.
    pub fn route(&self) -> &str {
        self.context.route().pattern().source()
    }

    /// Re-render now, if this controller is still the mounted one.
    pub fn refresh_view(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.refresh(Some(self.token())))
    }

    pub fn go_to(&self, path: &str) -> Result<(), HistoryError> {
        self.context.go_to(path)
    }

    pub fn go_replace(&self, path: &str) -> Result<(), HistoryError> {
        self.context.go_replace(path)
    }

    pub fn is_mounted(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| !shared.is_in_callback() && shared.mounted_token() == Some(self.token()))
    }
}
