//! Route matching logic.
//!
//! # Responsibilities
//! - Evaluate a path against each route in declared order
//! - Return the first accepting route with its captured params
//! - Report an explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - First match wins, not best match
//! - Pure and synchronous: no side effects, no allocation beyond captures

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::pattern::{Params, PathPattern};
use crate::routing::table::Route;

/// Trait for matching a path against a compiled condition.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns the captured params if the path matches.
    fn matches(&self, path: &str) -> Option<Params>;
}

impl Matcher for PathPattern {
    fn matches(&self, path: &str) -> Option<Params> {
        self.match_path(path)
    }
}

/// No route accepted the path and no catch-all was declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches `{path}`")]
pub struct NoRouteMatch {
    pub path: String,
}

/// A matched route with extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Position of the route in the table.
    pub index: usize,
    /// The matched route.
    pub route: Arc<Route>,
    /// Captured path parameters.
    pub params: Params,
}

/// Find the first route accepting `path`.
pub fn first_match(routes: &[Arc<Route>], path: &str) -> Result<RouteMatch, NoRouteMatch> {
    routes
        .iter()
        .enumerate()
        .find_map(|(index, route)| {
            route.pattern().matches(path).map(|params| RouteMatch {
                index,
                route: route.clone(),
                params,
            })
        })
        .ok_or_else(|| NoRouteMatch {
            path: path.to_string(),
        })
}
