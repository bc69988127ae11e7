//! Render targets.
//!
//! # Responsibilities
//! - Hold the markup a controller renders
//! - Resolve container selectors to handles
//!
//! # Design Decisions
//! - The coordinator only sees the `Container` and `Document` traits
//! - In-memory implementations back headless use and tests

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// An opaque region controllers render into.
pub trait Container: Send + Sync + fmt::Debug {
    /// Selector the container was found by.
    fn selector(&self) -> &str;

    /// Replace the container content.
    fn set_html(&self, html: &str);

    /// Current container content.
    fn html(&self) -> String;

    /// Remove all content.
    fn clear(&self) {
        self.set_html("");
    }
}

/// Looks containers up by selector.
pub trait Document: Send + Sync {
    fn query(&self, selector: &str) -> Option<Arc<dyn Container>>;
}

/// A container holding its markup in memory.
#[derive(Debug)]
pub struct MemoryContainer {
    selector: String,
    html: Mutex<String>,
}

impl MemoryContainer {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            html: Mutex::new(String::new()),
        }
    }
}

impl Container for MemoryContainer {
    fn selector(&self) -> &str {
        &self.selector
    }

    fn set_html(&self, html: &str) {
        let mut content = self.html.lock().unwrap_or_else(PoisonError::into_inner);
        content.clear();
        content.push_str(html);
    }

    fn html(&self) -> String {
        self.html.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A document with a fixed set of in-memory containers.
#[derive(Debug)]
pub struct MemoryDocument {
    containers: Mutex<HashMap<String, Arc<MemoryContainer>>>,
}

impl MemoryDocument {
    /// A document containing `body` and `#root`.
    pub fn new() -> Self {
        Self::with_selectors(["body", "#root"])
    }

    /// A document containing exactly the given selectors.
    pub fn with_selectors<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let containers = selectors
            .into_iter()
            .map(|s| {
                let selector = s.into();
                (selector.clone(), Arc::new(MemoryContainer::new(selector)))
            })
            .collect();
        Self {
            containers: Mutex::new(containers),
        }
    }

    /// Add a container, returning the existing one if present.
    pub fn insert(&self, selector: &str) -> Arc<MemoryContainer> {
        self.containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(selector.to_string())
            .or_insert_with(|| Arc::new(MemoryContainer::new(selector)))
            .clone()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn query(&self, selector: &str) -> Option<Arc<dyn Container>> {
        self.containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selector)
            .map(|c| c.clone() as Arc<dyn Container>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_content() {
        let container = MemoryContainer::new("body");
        container.set_html("home");
        assert_eq!(container.html(), "home");
        container.clear();
        assert_eq!(container.html(), "");
        assert_eq!(container.selector(), "body");
    }

    #[test]
    fn test_document_query() {
        let document = MemoryDocument::new();
        assert!(document.query("body").is_some());
        assert!(document.query("#root").is_some());
        assert!(document.query("#missing").is_none());

        let inserted = document.insert("#app");
        inserted.set_html("x");
        assert_eq!(document.query("#app").unwrap().html(), "x");
    }
}
