//! Navigation tokens.
//!
//! Every navigation attempt is stamped with a token when it starts
//! resolving. Only the holder of the latest token may mount.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Monotonic identity of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NavigationToken(u64);

impl NavigationToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NavigationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens and answers whether one is still the latest.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    latest: AtomicU64,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> NavigationToken {
        NavigationToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> NavigationToken {
        NavigationToken(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: NavigationToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
