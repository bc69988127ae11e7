//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! History change
//!     → coordinator.rs (issue token.rs token, state.rs transitions)
//!     → routing::RouteTable::match_path
//!     → controller::Resolver (maybe async)
//!     → mount / destroy / render
//!     → event.rs notifications to subscribers
//! ```
//!
//! # Design Decisions
//! - Latest navigation wins, decided by token equality
//! - Superseded navigations are silent: no event, no state change

pub mod coordinator;
pub mod event;
pub mod handle;
pub mod state;
pub mod token;

pub use coordinator::{Coordinator, NavigationOutcome};
pub use event::NavigationEvent;
pub use handle::ControllerHandle;
pub use state::NavigationState;
pub use token::{NavigationToken, TokenIssuer};
