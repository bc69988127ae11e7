//! Per-navigation controller context.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::history::{History, HistoryError, Location};
use crate::navigation::coordinator::Command;
use crate::navigation::NavigationToken;
use crate::routing::{Params, Route, RouteMatch};
use crate::view::Container;

/// What a controller knows about the navigation that created it, and the
/// controls it may use.
#[derive(Clone)]
pub struct ControllerContext {
    token: NavigationToken,
    location: Location,
    route: Arc<Route>,
    params: Params,
    container: Arc<dyn Container>,
    history: Arc<dyn History>,
    commands: mpsc::UnboundedSender<Command>,
}

impl ControllerContext {
    pub(crate) fn new(
        token: NavigationToken,
        location: Location,
        route_match: RouteMatch,
        container: Arc<dyn Container>,
        history: Arc<dyn History>,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            token,
            location,
            route: route_match.route,
            params: route_match.params,
            container,
            history,
            commands,
        }
    }

    /// The container this controller renders into.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn token(&self) -> NavigationToken {
        self.token
    }

    /// Navigate to `path`, adding a history entry.
    pub fn go_to(&self, path: &str) -> Result<(), HistoryError> {
        tracing::debug!(from = %self.location.pathname, to = %path, "Controller navigation (push)");
        self.history.push(path)
    }

    /// Navigate to `path`, replacing the current history entry.
    pub fn go_replace(&self, path: &str) -> Result<(), HistoryError> {
        tracing::debug!(from = %self.location.pathname, to = %path, "Controller navigation (replace)");
        self.history.replace(path)
    }

    /// Go one history entry back.
    pub fn go_back(&self) -> bool {
        self.history.back()
    }

    /// Ask the coordinator to render this controller again.
    ///
    /// Queued: it runs after the current callback returns, and only while
    /// this controller is still mounted.
    pub fn refresh_view(&self) -> bool {
        self.commands.send(Command::Refresh { token: self.token }).is_ok()
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("token", &self.token)
            .field("location", &self.location.path())
            .field("route", &self.route.pattern().source())
            .field("params", &self.params)
            .field("container", &self.container.selector())
            .finish()
    }
}
