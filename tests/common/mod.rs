//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use spa_router::controller::ControllerRegistry;
use spa_router::history::MemoryHistory;
use spa_router::view::MemoryContainer;
use spa_router::{
    App, Controller, ControllerContext, ControllerError, ControllerType, HistoryType, Loaded, NavigationEvent,
};
use tokio::sync::broadcast;

pub const ROUTES: [&str; 4] = ["/(home|debug.html)?", "/list", "/detail", "*"];

/// Lifecycle calls recorded by fixture controllers, in order.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|e| e == entry)
    }
}

/// A page controller with fixed output and an optional slow init.
pub struct Page {
    name: &'static str,
    output: &'static str,
    init_delay: Option<Duration>,
    fail_init: bool,
    journal: Journal,
}

#[async_trait]
impl Controller for Page {
    async fn init(&mut self, _ctx: &ControllerContext) -> Result<(), ControllerError> {
        self.journal.record(format!("init:{}", self.name));
        if let Some(delay) = self.init_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_init {
            return Err(ControllerError::new(format!("{} refused to start", self.name)));
        }
        Ok(())
    }

    fn render(&self, _ctx: &ControllerContext) -> String {
        self.journal.record(format!("render:{}", self.name));
        self.output.to_string()
    }

    fn destroy(&mut self, _ctx: &ControllerContext) {
        self.journal.record(format!("destroy:{}", self.name));
    }
}

pub fn page(name: &'static str, output: &'static str, journal: &Journal) -> ControllerType {
    build_page(name, output, None, false, journal)
}

pub fn slow_page(name: &'static str, output: &'static str, delay: Duration, journal: &Journal) -> ControllerType {
    build_page(name, output, Some(delay), false, journal)
}

pub fn failing_page(name: &'static str, journal: &Journal) -> ControllerType {
    build_page(name, "", None, true, journal)
}

fn build_page(
    name: &'static str,
    output: &'static str,
    init_delay: Option<Duration>,
    fail_init: bool,
    journal: &Journal,
) -> ControllerType {
    let journal = journal.clone();
    ControllerType::new(name, move |_| Page {
        name,
        output,
        init_delay,
        fail_init,
        journal: journal.clone(),
    })
}

pub fn home(journal: &Journal) -> ControllerType {
    page("Home", "home", journal)
}

/// List takes 50ms to initialize.
pub fn list(journal: &Journal) -> ControllerType {
    slow_page("List", "list", Duration::from_millis(50), journal)
}

pub fn detail(journal: &Journal) -> ControllerType {
    page("Detail", "detail", journal)
}

pub fn not_found(journal: &Journal) -> ControllerType {
    page("NotFound", "not found", journal)
}

pub fn registry(journal: &Journal) -> ControllerRegistry {
    ControllerRegistry::new()
        .register("home", home(journal))
        .register("list", list(journal))
        .register("detail", detail(journal))
        .register("not-found", not_found(journal))
}

/// How the scenario app obtains its controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderMode {
    /// Factory references, no loader.
    None,
    /// Named references, loader answers immediately.
    Sync,
    /// Named references, loader answers after a delay.
    Async,
}

pub const LOADER_MODES: [LoaderMode; 3] = [LoaderMode::None, LoaderMode::Sync, LoaderMode::Async];
pub const HISTORY_TYPES: [HistoryType; 2] = [HistoryType::Hash, HistoryType::Browser];

pub const ASYNC_LOAD_DELAY: Duration = Duration::from_millis(10);

/// Loader that resolves through the registry after `delay`.
pub fn delayed_loader(registry: ControllerRegistry, delay: Duration) -> impl Fn(&str) -> Loaded + Send + Sync {
    move |id: &str| {
        let found = registry.get(id).cloned();
        let id = id.to_string();
        Loaded::pending(async move {
            tokio::time::sleep(delay).await;
            found.ok_or_else(|| ControllerError::new(format!("no chunk for `{}`", id)))
        })
    }
}

/// Home / List / Detail / NotFound app in the given flavour.
pub fn scenario_app(kind: HistoryType, mode: LoaderMode, journal: &Journal) -> App {
    let ids = ["home", "list", "detail", "not-found"];
    let types = [home(journal), list(journal), detail(journal), not_found(journal)];

    let mut builder = App::builder()
        .history_type(kind)
        .container_handle(Arc::new(MemoryContainer::new("#root")));

    match mode {
        LoaderMode::None => {
            for (path, controller) in ROUTES.iter().zip(types) {
                builder = builder.route(*path, controller);
            }
        }
        LoaderMode::Sync => {
            for (path, id) in ROUTES.iter().zip(ids) {
                builder = builder.route(*path, id);
            }
            builder = builder.loader(registry(journal));
        }
        LoaderMode::Async => {
            for (path, id) in ROUTES.iter().zip(ids) {
                builder = builder.route(*path, id);
            }
            builder = builder.loader(delayed_loader(registry(journal), ASYNC_LOAD_DELAY));
        }
    }

    builder.build().unwrap()
}

/// An app over an injected history, for tests that drive history directly.
pub fn app_with_history(history: Arc<MemoryHistory>, journal: &Journal) -> App {
    App::builder()
        .history(history)
        .container_handle(Arc::new(MemoryContainer::new("#root")))
        .route("/(home|debug.html)?", home(journal))
        .route("/list", list(journal))
        .route("/detail", detail(journal))
        .route("*", not_found(journal))
        .build()
        .unwrap()
}

/// Wait until `check` holds or fail after one second.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached within 1s");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

/// Next subscription event, failing after one second.
pub async fn next_event(events: &mut broadcast::Receiver<NavigationEvent>) -> NavigationEvent {
    tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("no navigation event within 1s")
        .expect("event channel closed")
}
