//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)                 AppBuilder (code)
//!     → loader.rs (parse)                → factory routes, loader,
//!     → validation.rs (semantic checks)    container handle, history
//!     → AppConfig ────────────────────────┘
//!     → RouteTable compiled once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the app is built
//! - Everything except `routes` has a default to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, EventsConfig, HistoryType, ObservabilityConfig, RouteConfig};
pub use validation::ValidationError;
