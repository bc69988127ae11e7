//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Location change (pathname)
//!     → table.rs (ordered route lookup)
//!     → matcher.rs (evaluate patterns, first match wins)
//!     → Return: RouteMatch { route, params } or NoRouteMatch
//!
//! Route Compilation (at app creation):
//!     RouteDef[]
//!     → pattern.rs (compile path expressions)
//!     → Validate ordering (catch-all last)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable at runtime
//! - No regex (segment matching only)
//! - Deterministic: same path always matches same route

pub mod matcher;
pub mod pattern;
pub mod table;

pub use matcher::{Matcher, NoRouteMatch, RouteMatch};
pub use pattern::{Params, PathPattern, PatternError};
pub use table::{Route, RouteDef, RouteTable};
