//! Route table compilation and lookup.
//!
//! # Responsibilities
//! - Compile route definitions into patterns once, at app creation
//! - Reject tables that would misroute (bad patterns, shadowed routes)
//! - Look up the first route matching a path
//!
//! # Design Decisions
//! - Immutable after construction, shared via Arc
//! - Declared order is match order
//! - A catch-all must be last; anything after it is unreachable and rejected

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::validation::{validate_controller_ref, ValidationError};
use crate::config::RouteConfig;
use crate::controller::ControllerRef;
use crate::routing::matcher::{first_match, NoRouteMatch, RouteMatch};
use crate::routing::pattern::PathPattern;

/// A route definition as supplied by configuration or the builder.
#[derive(Clone)]
pub struct RouteDef {
    pub path: String,
    pub controller: ControllerRef,
    pub name: Option<String>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, controller: impl Into<ControllerRef>) -> Self {
        Self {
            path: path.into(),
            controller: controller.into(),
            name: None,
        }
    }

    /// Attach a name used in logs and lookups.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<RouteConfig> for RouteDef {
    fn from(config: RouteConfig) -> Self {
        Self {
            path: config.path,
            controller: ControllerRef::Named(config.controller),
            name: config.name,
        }
    }
}

impl fmt::Debug for RouteDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("path", &self.path)
            .field("controller", &self.controller)
            .field("name", &self.name)
            .finish()
    }
}

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    controller: ControllerRef,
    name: Option<String>,
}

impl Route {
    pub fn new(pattern: PathPattern, controller: ControllerRef) -> Self {
        Self {
            pattern,
            controller,
            name: None,
        }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn controller(&self) -> &ControllerRef {
        &self.controller
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Ordered, immutable set of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    /// Compile route definitions, collecting every problem found.
    ///
    /// `loader_configured` tells whether named controller references can be
    /// resolved at all.
    pub fn compile(
        defs: impl IntoIterator<Item = RouteDef>,
        loader_configured: bool,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut routes = Vec::new();
        let mut names = HashSet::new();
        let mut catch_all: Option<usize> = None;

        for (index, def) in defs.into_iter().enumerate() {
            if let Some(catch_all) = catch_all {
                errors.push(ValidationError::UnreachableRoute {
                    index,
                    path: def.path.clone(),
                    catch_all,
                });
            }

            errors.extend(validate_controller_ref(
                index,
                &def.path,
                &def.controller,
                loader_configured,
            ));

            if let Some(name) = &def.name {
                if !names.insert(name.clone()) {
                    errors.push(ValidationError::DuplicateRouteName(name.clone()));
                }
            }

            match PathPattern::parse(&def.path) {
                Ok(pattern) => {
                    if pattern.is_catch_all() && catch_all.is_none() {
                        catch_all = Some(index);
                    }
                    routes.push(Arc::new(Route {
                        pattern,
                        controller: def.controller,
                        name: def.name,
                    }));
                }
                Err(source) => errors.push(ValidationError::InvalidPattern {
                    index,
                    path: def.path,
                    source,
                }),
            }
        }

        if errors.is_empty() {
            tracing::debug!(routes = routes.len(), catch_all = ?catch_all, "Route table compiled");
            Ok(Self { routes })
        } else {
            Err(errors)
        }
    }

    /// Look up the first route accepting `path`.
    pub fn match_path(&self, path: &str) -> Result<RouteMatch, NoRouteMatch> {
        first_match(&self.routes, path)
    }

    /// The declared catch-all route, if any.
    pub fn catch_all(&self) -> Option<&Arc<Route>> {
        self.routes.iter().find(|r| r.pattern().is_catch_all())
    }

    /// Find a route by name.
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.routes.iter().find(|r| r.name() == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
