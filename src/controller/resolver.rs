//! Controller resolution.
//!
//! # Responsibilities
//! - Turn a `ControllerRef` into a controller type
//! - Keep synchronous resolutions synchronous
//! - Hand pending loads to the coordinator without awaiting them here

use std::fmt;
use std::sync::Arc;

use crate::controller::loader::{Loaded, Loader, PendingController};
use crate::controller::{ControllerRef, ControllerType};
use crate::error::AppError;

/// Outcome of resolving a controller reference.
pub enum Resolution {
    Ready(ControllerType),
    Pending(PendingResolution),
}

/// A loader result that has not settled yet.
pub struct PendingResolution {
    controller: String,
    future: PendingController,
}

impl PendingResolution {
    /// The identifier being loaded.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Wait for the loader.
    pub async fn settle(self) -> Result<ControllerType, AppError> {
        let Self { controller, future } = self;
        future.await.map_err(|e| AppError::LoaderFailure {
            controller,
            message: e.to_string(),
        })
    }
}

/// Resolves controller references, optionally through a loader.
#[derive(Clone, Default)]
pub struct Resolver {
    loader: Option<Arc<dyn Loader>>,
}

impl Resolver {
    pub fn new(loader: Option<Arc<dyn Loader>>) -> Self {
        Self { loader }
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    pub fn resolve(&self, controller: &ControllerRef) -> Result<Resolution, AppError> {
        match controller {
            ControllerRef::Factory(factory) => Ok(Resolution::Ready(factory())),
            ControllerRef::Named(id) => {
                let loader = self.loader.as_ref().ok_or_else(|| AppError::LoaderMissing {
                    controller: id.clone(),
                })?;
                match loader.load(id) {
                    Loaded::Ready(found) => Ok(Resolution::Ready(found)),
                    Loaded::Pending(future) => Ok(Resolution::Pending(PendingResolution {
                        controller: id.clone(),
                        future,
                    })),
                }
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}
