//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! App::start
//!     → coordinator spawns the driver task subscribed to the StopSignal
//!     → history listener registered
//!
//! App::stop (shutdown.rs):
//!     StopSignal::trigger → driver exits → listener removed
//!     → mounted controller destroyed → state = Stopped
//! ```
//!
//! # Design Decisions
//! - Stop is idempotent: only the first trigger does any work
//! - In-flight navigations are abandoned, never awaited

pub mod shutdown;

pub use shutdown::StopSignal;
