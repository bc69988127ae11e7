//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check controller references can be resolved
//! - Validate value ranges (event capacity > 0, container present)
//! - Detect shadowed routes (anything after a catch-all)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::controller::ControllerRef;
use crate::routing::table::{RouteDef, RouteTable};
use crate::routing::PatternError;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("container selector must not be empty")]
    EmptyContainer,

    #[error("events.capacity must be greater than zero")]
    ZeroEventCapacity,

    #[error("route #{index} (`{path}`): {source}")]
    InvalidPattern {
        index: usize,
        path: String,
        source: PatternError,
    },

    #[error("route #{index} (`{path}`): controller identifier is empty")]
    EmptyController { index: usize, path: String },

    #[error("route #{index} (`{path}`): controller `{controller}` needs a loader")]
    LoaderRequired {
        index: usize,
        path: String,
        controller: String,
    },

    #[error("route #{index} (`{path}`) is unreachable behind catch-all route #{catch_all}")]
    UnreachableRoute {
        index: usize,
        path: String,
        catch_all: usize,
    },

    #[error("route name `{0}` is used twice")]
    DuplicateRouteName(String),
}

/// Check a single controller reference.
pub fn validate_controller_ref(
    index: usize,
    path: &str,
    controller: &ControllerRef,
    loader_configured: bool,
) -> Option<ValidationError> {
    match controller {
        ControllerRef::Factory(_) => None,
        ControllerRef::Named(id) if id.trim().is_empty() => Some(ValidationError::EmptyController {
            index,
            path: path.to_string(),
        }),
        ControllerRef::Named(id) if !loader_configured => Some(ValidationError::LoaderRequired {
            index,
            path: path.to_string(),
            controller: id.clone(),
        }),
        ControllerRef::Named(_) => None,
    }
}

/// Validate a configuration file on its own.
///
/// Routes from a file are always loader identifiers, so the loader is
/// assumed to be supplied when the app is built.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.container.trim().is_empty() {
        errors.push(ValidationError::EmptyContainer);
    }
    if config.events.capacity == 0 {
        errors.push(ValidationError::ZeroEventCapacity);
    }

    let routes = config.routes.iter().cloned().map(RouteDef::from);
    if let Err(route_errors) = RouteTable::compile(routes, true) {
        errors.extend(route_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    fn route(path: &str, controller: &str) -> RouteConfig {
        RouteConfig {
            path: path.into(),
            controller: controller.into(),
            name: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = AppConfig::default();
        config.routes.push(route("/", "home"));
        config.routes.push(route("*", "not-found"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = AppConfig::default();
        config.container = " ".into();
        config.events.capacity = 0;
        config.routes.push(route("*", "not-found"));
        config.routes.push(route("/late", "late"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ValidationError::EmptyContainer);
        assert_eq!(errors[1], ValidationError::ZeroEventCapacity);
        assert_eq!(
            errors[2].to_string(),
            "route #1 (`/late`) is unreachable behind catch-all route #0"
        );
    }

    #[test]
    fn test_factory_refs_skip_loader_check() {
        let factory = ControllerRef::factory(|| unreachable!("never resolved during validation"));
        assert!(validate_controller_ref(0, "/", &factory, false).is_none());
        assert!(validate_controller_ref(0, "/", &ControllerRef::named("home"), false).is_some());
    }
}
