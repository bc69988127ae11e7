//! Client-side router and controller coordinator.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;
pub mod view;

pub use app::{App, AppBuilder};
pub use config::schema::{AppConfig, HistoryType};
pub use controller::{Controller, ControllerContext, ControllerError, ControllerRef, ControllerType, Loaded, Loader};
pub use error::AppError;
pub use history::{History, Location};
pub use navigation::{NavigationEvent, NavigationOutcome, NavigationState};
