//! Location values delivered by history implementations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::history::HistoryError;

const BASE_URL: &str = "http://localhost/";

/// Identity of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey(pub u64);

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the location was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Push,
    Replace,
    Pop,
}

/// A parsed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path component, always starting with `/`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
    /// Decoded query parameters (last value wins).
    pub query: BTreeMap<String, String>,
    pub action: Action,
    pub key: LocationKey,
}

impl Location {
    /// Parse a path such as `/detail?id=1#top`.
    ///
    /// Leading slashes are collapsed so the path can never escape the app
    /// origin, and dot segments are resolved.
    pub fn parse(path: &str, action: Action, key: LocationKey) -> Result<Self, HistoryError> {
        let invalid = |source| HistoryError::InvalidPath {
            path: path.to_string(),
            source,
        };
        let base = Url::parse(BASE_URL).map_err(invalid)?;
        let url = base
            .join(&format!("/{}", path.trim_start_matches('/')))
            .map_err(invalid)?;

        let search = match url.query() {
            Some(q) if !q.is_empty() => format!("?{}", q),
            _ => String::new(),
        };
        let hash = match url.fragment() {
            Some(f) if !f.is_empty() => format!("#{}", f),
            _ => String::new(),
        };

        Ok(Self {
            pathname: url.path().to_string(),
            search,
            hash,
            query: url.query_pairs().into_owned().collect(),
            action,
            key,
        })
    }

    /// The root location `/`.
    pub fn root(key: LocationKey) -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
            query: BTreeMap::new(),
            action: Action::Pop,
            key,
        }
    }

    /// Full path: pathname, search and hash.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
