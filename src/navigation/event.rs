//! Notifications delivered to subscribers.

use serde::Serialize;

use crate::history::Location;
use crate::navigation::NavigationToken;

/// A navigation that completed, successfully or not.
///
/// Superseded navigations produce no event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// A controller was mounted and rendered for `location`.
    Mounted {
        token: NavigationToken,
        location: Location,
        route: String,
    },
    /// No route matched and no catch-all is declared.
    NotFound {
        token: NavigationToken,
        location: Location,
    },
    /// The loader failed; the previous controller stays mounted.
    LoaderFailed {
        token: NavigationToken,
        location: Location,
        controller: String,
        message: String,
    },
    /// The controller's init failed; the previous controller stays mounted.
    InitFailed {
        token: NavigationToken,
        location: Location,
        message: String,
    },
}

impl NavigationEvent {
    pub fn location(&self) -> &Location {
        match self {
            Self::Mounted { location, .. }
            | Self::NotFound { location, .. }
            | Self::LoaderFailed { location, .. }
            | Self::InitFailed { location, .. } => location,
        }
    }

    pub fn token(&self) -> NavigationToken {
        match self {
            Self::Mounted { token, .. }
            | Self::NotFound { token, .. }
            | Self::LoaderFailed { token, .. }
            | Self::InitFailed { token, .. } => *token,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted { .. })
    }
}
