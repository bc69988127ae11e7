//! Controller subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch.route.controller (ControllerRef)
//!     → resolver.rs
//!         Factory(fn)      → ControllerType (sync)
//!         Named(id)        → loader.rs → Ready(ControllerType) | Pending(future)
//!     → coordinator instantiates ControllerType with a ControllerContext
//!     → init (async) → render → ... → destroy
//! ```
//!
//! # Design Decisions
//! - The resolution mechanism is a tagged variant fixed when the route is declared
//! - The resolver never mounts; it only answers "which controller type"
//! - Controllers render markup; the coordinator owns the container writes

pub mod context;
pub mod loader;
pub mod resolver;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use context::ControllerContext;
pub use loader::{ControllerRegistry, Loaded, Loader, PendingController};
pub use resolver::{PendingResolution, Resolution, Resolver};

/// Failure reported by a loader or a controller's `init`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ControllerError {
    message: String,
}

impl ControllerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ControllerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ControllerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// A view with a lifecycle, mounted by the coordinator for one navigation.
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    /// Prepare the controller before it is rendered.
    ///
    /// The mount waits for this future; a newer navigation may supersede the
    /// mount while it is pending.
    async fn init(&mut self, _ctx: &ControllerContext) -> Result<(), ControllerError> {
        Ok(())
    }

    /// Produce the markup for the container.
    fn render(&self, ctx: &ControllerContext) -> String;

    /// Release resources. Called exactly once, when the controller is replaced
    /// or the app stops.
    fn destroy(&mut self, _ctx: &ControllerContext) {}
}

type Construct = dyn Fn(&ControllerContext) -> Box<dyn Controller> + Send + Sync;

/// A named constructor for controller instances.
#[derive(Clone)]
pub struct ControllerType {
    name: Arc<str>,
    construct: Arc<Construct>,
}

impl ControllerType {
    pub fn new<C, F>(name: impl Into<String>, construct: F) -> Self
    where
        C: Controller,
        F: Fn(&ControllerContext) -> C + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            construct: Arc::new(move |ctx: &ControllerContext| Box::new(construct(ctx)) as Box<dyn Controller>),
        }
    }

    /// Controller type built with `Default`, named after the Rust type.
    pub fn of<C: Controller + Default>() -> Self {
        let full = std::any::type_name::<C>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self::new(name, |_| C::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn instantiate(&self, ctx: &ControllerContext) -> Box<dyn Controller> {
        (self.construct)(ctx)
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControllerType").field(&self.name).finish()
    }
}

/// How a route obtains its controller type.
#[derive(Clone)]
pub enum ControllerRef {
    /// Invoked synchronously on every navigation to the route.
    Factory(Arc<dyn Fn() -> ControllerType + Send + Sync>),
    /// Identifier handed to the loader.
    Named(String),
}

impl ControllerRef {
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> ControllerType + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// Factory ref for a `Default` controller.
    pub fn of<C: Controller + Default>() -> Self {
        Self::from(ControllerType::of::<C>())
    }

    pub fn named(id: impl Into<String>) -> Self {
        Self::Named(id.into())
    }

    /// The loader identifier, for named refs.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Named(id) => Some(id),
            Self::Factory(_) => None,
        }
    }
}

impl fmt::Debug for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Named(id) => f.debug_tuple("Named").field(id).finish(),
        }
    }
}

impl From<&str> for ControllerRef {
    fn from(id: &str) -> Self {
        Self::named(id)
    }
}

impl From<String> for ControllerRef {
    fn from(id: String) -> Self {
        Self::Named(id)
    }
}

impl From<ControllerType> for ControllerRef {
    fn from(controller: ControllerType) -> Self {
        Self::factory(move || controller.clone())
    }
}
