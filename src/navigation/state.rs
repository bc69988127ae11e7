//! Coordinator state machine.
//!
//! # States
//! - Idle: nothing mounted, nothing in flight
//! - Resolving(t): matching and resolving the controller for token t
//! - Mounting(t): controller constructed, waiting for its init
//! - Mounted(t): controller for t is rendered
//! - Stopped: terminal, no navigation is processed
//!
//! # State Transitions
//! ```text
//! any (not Stopped) → Resolving(t): location change issues t
//! Resolving(t) → Mounting(t): controller type resolved and t still latest
//! Mounting(t) → Mounted(t): init done and t still latest
//! Resolving(t)/Mounting(t) → Mounted(prev) | Idle: navigation t failed
//! any → Stopped: app stopped
//! ```
//!
//! # Design Decisions
//! - The state reflects the latest token only; superseded work never transitions
//! - Stopped is sticky

use crate::navigation::NavigationToken;

/// Where the coordinator is in the navigation lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    Idle,
    Resolving(NavigationToken),
    Mounting(NavigationToken),
    Mounted(NavigationToken),
    Stopped,
}

impl NavigationState {
    /// Token of the navigation this state refers to.
    pub fn token(&self) -> Option<NavigationToken> {
        match self {
            Self::Resolving(t) | Self::Mounting(t) | Self::Mounted(t) => Some(*t),
            Self::Idle | Self::Stopped => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Apply a transition. Nothing leaves `Stopped`.
    pub(crate) fn advance(&mut self, next: NavigationState) {
        if !self.is_stopped() {
            *self = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::TokenIssuer;

    #[test]
    fn test_stopped_is_sticky() {
        let issuer = TokenIssuer::new();
        let token = issuer.issue();

        let mut state = NavigationState::default();
        state.advance(NavigationState::Resolving(token));
        assert_eq!(state.token(), Some(token));

        state.advance(NavigationState::Stopped);
        state.advance(NavigationState::Mounted(token));
        assert!(state.is_stopped());
        assert_eq!(state.token(), None);
    }
}
