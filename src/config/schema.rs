//! Configuration schema definitions.
//!
//! This module defines the declarative part of an app configuration.
//! All types derive Serde traits for deserialization from config files.
//! Controller factories, loaders and container handles are code, not data,
//! and are supplied through [`AppBuilder`](crate::app::AppBuilder).

use serde::{Deserialize, Serialize};

/// Root configuration for an app.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Route definitions, in match order. Required, may be empty.
    pub routes: Vec<RouteConfig>,

    /// Selector of the container controllers render into.
    #[serde(default = "default_container")]
    pub container: String,

    /// History implementation selector.
    #[serde(default, rename = "type")]
    pub history: HistoryType,

    /// Subscription channel settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            container: default_container(),
            history: HistoryType::default(),
            events: EventsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_container() -> String {
    "#root".to_string()
}

/// A route whose controller is resolved through the loader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, e.g. `/users/:id` or `*`.
    pub path: String,

    /// Controller identifier handed to the loader.
    pub controller: String,

    /// Optional route name for logs and lookups.
    #[serde(default)]
    pub name: Option<String>,
}

/// Which history flavour drives the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryType {
    /// Locations live in the URL fragment (`#/path`).
    #[default]
    Hash,
    /// Locations are real paths (push-state).
    Browser,
}

/// Subscription channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Buffered events per subscriber before it starts lagging.
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
