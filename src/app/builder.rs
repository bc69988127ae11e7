//! App construction.
//!
//! # Responsibilities
//! - Merge file configuration with programmatic routes and collaborators
//! - Validate everything at once and report every problem
//! - Compile the route table once
//! - Resolve the container and pick the history implementation
//!
//! # Design Decisions
//! - Config routes come first, then routes added in code, in call order
//! - An injected container handle bypasses selector lookup
//! - An injected history wins over the configured history type

use std::path::Path;
use std::sync::Arc;

use crate::app::App;
use crate::config::{load_config, AppConfig, HistoryType, ValidationError};
use crate::controller::{ControllerRef, Loader, Resolver};
use crate::error::AppError;
use crate::history::{create_history, History};
use crate::navigation::Coordinator;
use crate::routing::{RouteDef, RouteTable};
use crate::view::{Container, Document, MemoryDocument};

/// Builder for [`App`].
#[derive(Default)]
pub struct AppBuilder {
    config: AppConfig,
    routes: Vec<RouteDef>,
    loader: Option<Arc<dyn Loader>>,
    container: Option<Arc<dyn Container>>,
    document: Option<Arc<dyn Document>>,
    history: Option<Arc<dyn History>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        Ok(Self::new().config(load_config(path)?))
    }

    /// Replace the declarative configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a route. A string controller is a loader identifier.
    pub fn route(self, path: impl Into<String>, controller: impl Into<ControllerRef>) -> Self {
        self.route_def(RouteDef::new(path, controller))
    }

    pub fn route_def(mut self, def: RouteDef) -> Self {
        self.routes.push(def);
        self
    }

    pub fn routes(mut self, defs: impl IntoIterator<Item = RouteDef>) -> Self {
        self.routes.extend(defs);
        self
    }

    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Container selector, looked up in the document at build time.
    pub fn container(mut self, selector: impl Into<String>) -> Self {
        self.config.container = selector.into();
        self
    }

    /// Use this container directly instead of looking one up.
    pub fn container_handle(mut self, container: Arc<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn document(mut self, document: Arc<dyn Document>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn history_type(mut self, kind: HistoryType) -> Self {
        self.config.history = kind;
        self
    }

    /// Use this history instead of creating one from the history type.
    pub fn history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.events.capacity = capacity;
        self
    }

    /// Validate, compile the route table and assemble the app.
    pub fn build(self) -> Result<App, AppError> {
        let Self {
            config,
            routes,
            loader,
            container,
            document,
            history,
        } = self;

        let mut errors = Vec::new();
        if container.is_none() && config.container.trim().is_empty() {
            errors.push(ValidationError::EmptyContainer);
        }
        if config.events.capacity == 0 {
            errors.push(ValidationError::ZeroEventCapacity);
        }

        let resolver = Resolver::new(loader);
        let defs = config.routes.iter().cloned().map(RouteDef::from).chain(routes);
        let table = match RouteTable::compile(defs, resolver.has_loader()) {
            Ok(table) => Some(table),
            Err(route_errors) => {
                errors.extend(route_errors);
                None
            }
        };

        let table = match table {
            Some(table) if errors.is_empty() => table,
            _ => {
                tracing::error!(errors = errors.len(), "App configuration rejected");
                return Err(AppError::Validation(errors));
            }
        };

        let container = match container {
            Some(container) => container,
            None => {
                let document = document.unwrap_or_else(|| Arc::new(MemoryDocument::new()));
                document
                    .query(&config.container)
                    .ok_or_else(|| AppError::ContainerNotFound(config.container.clone()))?
            }
        };

        let history = history.unwrap_or_else(|| create_history(config.history));

        tracing::info!(
            routes = table.len(),
            container = %container.selector(),
            history = ?history.kind(),
            loader = resolver.has_loader(),
            "App built"
        );

        let coordinator = Coordinator::new(Arc::new(table), resolver, history, container, config.events.capacity);
        Ok(App::new(coordinator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::controller::{Controller, ControllerContext, ControllerRegistry, ControllerType};
    use crate::view::MemoryContainer;

    #[derive(Default)]
    struct Home;

    impl Controller for Home {
        fn render(&self, _ctx: &ControllerContext) -> String {
            "home".into()
        }
    }

    #[test]
    fn test_defaults() {
        let app = AppBuilder::new().route("/", ControllerRef::of::<Home>()).build().unwrap();
        assert_eq!(app.container().selector(), "#root");
        assert_eq!(app.history().kind(), HistoryType::Hash);
        assert_eq!(app.routes().len(), 1);
    }

    #[test]
    fn test_collects_all_errors() {
        let err = AppBuilder::new()
            .container("")
            .event_capacity(0)
            .route("/list", "list")
            .build()
            .err()
            .unwrap();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyContainer));
        assert!(errors.contains(&ValidationError::ZeroEventCapacity));
        assert!(matches!(&errors[2], ValidationError::LoaderRequired { controller, .. } if controller == "list"));
    }

    #[test]
    fn test_container_not_found() {
        let err = AppBuilder::new()
            .container("#missing")
            .route("/", ControllerRef::of::<Home>())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AppError::ContainerNotFound(s) if s == "#missing"));
    }

    #[test]
    fn test_config_routes_first() {
        let config = AppConfig {
            routes: vec![RouteConfig {
                path: "/home".into(),
                controller: "home".into(),
                name: Some("home".into()),
            }],
            ..AppConfig::default()
        };

        let app = AppBuilder::new()
            .config(config)
            .route("*", ControllerType::of::<Home>())
            .loader(ControllerRegistry::new().register("home", ControllerType::of::<Home>()))
            .container_handle(Arc::new(MemoryContainer::new("#app")))
            .history_type(HistoryType::Browser)
            .build()
            .unwrap();

        let sources: Vec<_> = app.routes().iter().map(|r| r.pattern().source().to_string()).collect();
        assert_eq!(sources, vec!["/home", "*"]);
        assert!(app.routes().named("home").is_some());
        assert_eq!(app.container().selector(), "#app");
        assert_eq!(app.history().kind(), HistoryType::Browser);
    }
}
