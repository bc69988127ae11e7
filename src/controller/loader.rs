//! Controller loaders.
//!
//! A loader maps a controller identifier to a controller type, either
//! immediately or through a future (code splitting, remote fetch).

use std::collections::HashMap;
use std::future::Future;

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::controller::{ControllerError, ControllerType};

/// Future yielding a controller type.
pub type PendingController = BoxFuture<'static, Result<ControllerType, ControllerError>>;

/// What a loader produced for an identifier.
pub enum Loaded {
    Ready(ControllerType),
    Pending(PendingController),
}

impl Loaded {
    pub fn ready(controller: ControllerType) -> Self {
        Self::Ready(controller)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<ControllerType, ControllerError>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    /// A load that has already failed.
    pub fn failed(error: impl Into<ControllerError>) -> Self {
        Self::Pending(future::ready(Err(error.into())).boxed())
    }
}

/// Resolves controller identifiers.
pub trait Loader: Send + Sync {
    fn load(&self, controller: &str) -> Loaded;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Loaded + Send + Sync,
{
    fn load(&self, controller: &str) -> Loaded {
        self(controller)
    }
}

/// A loader over a fixed identifier → type map.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    types: HashMap<String, ControllerType>,
    fallback: Option<ControllerType>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, id: impl Into<String>, controller: ControllerType) -> Self {
        self.types.insert(id.into(), controller);
        self
    }

    /// Type used for identifiers that are not registered.
    pub fn fallback(mut self, controller: ControllerType) -> Self {
        self.fallback = Some(controller);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ControllerType> {
        self.types.get(id).or(self.fallback.as_ref())
    }
}

impl Loader for ControllerRegistry {
    fn load(&self, controller: &str) -> Loaded {
        match self.get(controller) {
            Some(found) => Loaded::Ready(found.clone()),
            None => Loaded::failed(format!("unknown controller `{}`", controller)),
        }
    }
}
