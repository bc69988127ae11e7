//! Router error types.

use thiserror::Error;

use crate::config::loader::join_errors;
use crate::config::{ConfigError, ValidationError};
use crate::history::HistoryError;
use crate::routing::NoRouteMatch;

/// Error type for building, starting and navigating an app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Builder input failed validation. Every problem is listed.
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// No container matches the configured selector.
    #[error("container `{0}` not found")]
    ContainerNotFound(String),

    /// No route matches and no catch-all is declared.
    #[error(transparent)]
    NoRouteMatch(#[from] NoRouteMatch),

    /// A named controller was requested without a loader.
    #[error("controller `{controller}` requires a loader, but none is configured")]
    LoaderMissing { controller: String },

    /// The loader's pending resolution failed.
    #[error("loader failed to resolve controller `{controller}`: {message}")]
    LoaderFailure { controller: String, message: String },

    /// The controller's init failed; the mount was abandoned.
    #[error("controller init failed for `{path}`: {message}")]
    InitFailure { path: String, message: String },

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("router already started")]
    AlreadyStarted,

    #[error("router not started")]
    NotStarted,

    #[error("router stopped")]
    Stopped,

    /// History accepted the path but never notified the router.
    #[error("history did not notify the router of the navigation")]
    NotListening,
}

impl AppError {
    /// Whether the current controller stayed mounted despite this error.
    pub fn is_navigation_failure(&self) -> bool {
        matches!(
            self,
            Self::NoRouteMatch(_) | Self::LoaderMissing { .. } | Self::LoaderFailure { .. } | Self::InitFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = AppError::from(NoRouteMatch { path: "/nope".into() });
        assert_eq!(err.to_string(), "no route matches `/nope`");
        assert!(err.is_navigation_failure());

        let err = AppError::Validation(vec![ValidationError::EmptyContainer, ValidationError::ZeroEventCapacity]);
        assert!(err.to_string().starts_with("Validation failed: "));
        assert!(!err.is_navigation_failure());
    }
}
