//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator, builder, history listener:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (navigation counters and durations)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding program installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber or recorder on its own
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
