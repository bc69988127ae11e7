//! Overlapping navigations: only the latest one may mount.

use std::sync::Arc;
use std::time::Duration;

use spa_router::controller::ControllerRegistry;
use spa_router::history::{History, MemoryHistory};
use spa_router::view::MemoryContainer;
use spa_router::{App, AppError, ControllerError, HistoryType, Loaded, NavigationEvent, NavigationOutcome};

mod common;

use common::Journal;

/// `/slow` loads in 100ms, `/fast` in 10ms.
fn racing_app(journal: &Journal) -> App {
    let registry = ControllerRegistry::new()
        .register("slow", common::page("Slow", "slow", journal))
        .register("fast", common::page("Fast", "fast", journal));

    App::builder()
        .container_handle(Arc::new(MemoryContainer::new("#root")))
        .route("/slow", "slow")
        .route("/fast", "fast")
        .loader(move |id: &str| {
            let found = registry.get(id).cloned();
            let delay = if id == "slow" { 100 } else { 10 };
            Loaded::pending(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                found.ok_or_else(|| ControllerError::new("missing"))
            })
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_late_async_load_never_mounts() {
    let journal = Journal::default();
    let app = racing_app(&journal);
    let mut events = app.subscribe();
    app.start(false).await.unwrap();

    let (slow, fast) = tokio::join!(app.navigate("/slow"), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        app.navigate("/fast").await
    });

    assert!(matches!(slow, Ok(NavigationOutcome::Superseded(l)) if l.pathname == "/slow"));
    assert!(matches!(fast, Ok(NavigationOutcome::Mounted(l)) if l.pathname == "/fast"));
    assert_eq!(app.container().html(), "fast");
    assert_eq!(journal.count("init:Slow"), 0);

    let event = common::next_event(&mut events).await;
    assert!(matches!(&event, NavigationEvent::Mounted { route, .. } if route == "/fast"));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_slow_init_superseded() {
    let journal = Journal::default();
    let app = common::scenario_app(HistoryType::Browser, common::LoaderMode::None, &journal);
    app.start(false).await.unwrap();

    let (list, detail) = tokio::join!(app.navigate("/list"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.navigate("/detail").await
    });

    assert!(matches!(list, Ok(NavigationOutcome::Superseded(_))));
    assert!(detail.unwrap().is_mounted());
    assert_eq!(app.container().html(), "detail");

    // List finished init but was never mounted, so it is not destroyed either.
    assert_eq!(journal.count("init:List"), 1);
    assert_eq!(journal.count("render:List"), 0);
    assert_eq!(journal.count("destroy:List"), 0);
}

#[tokio::test]
async fn test_synchronous_burst_mounts_each_in_order() {
    let journal = Journal::default();
    let history = Arc::new(MemoryHistory::new(HistoryType::Browser));
    let app = common::app_with_history(history.clone(), &journal);
    let mut events = app.subscribe();
    app.start(false).await.unwrap();

    history.push("/detail").unwrap();
    history.push("/nope").unwrap();
    history.push("/").unwrap();

    // Nothing suspends, so no navigation can be overtaken.
    for expected in ["/detail", "/nope", "/"] {
        let event = common::next_event(&mut events).await;
        assert!(event.is_mounted());
        assert_eq!(event.location().pathname, expected);
    }
    assert_eq!(app.container().html(), "home");
    assert_eq!(journal.count("destroy:Detail"), 1);
    assert_eq!(journal.count("destroy:NotFound"), 1);
    assert_eq!(journal.count("destroy:Home"), 0);
}

#[tokio::test]
async fn test_same_path_pushed_twice_mounts_twice() {
    let journal = Journal::default();
    let history = Arc::new(MemoryHistory::new(HistoryType::Browser));
    let app = common::app_with_history(history.clone(), &journal);
    let mut events = app.subscribe();
    app.start(false).await.unwrap();

    history.push("/detail").unwrap();
    history.push("/detail").unwrap();

    let first = common::next_event(&mut events).await;
    let second = common::next_event(&mut events).await;
    assert!(first.is_mounted() && second.is_mounted());
    assert!(first.token() < second.token());
    assert_eq!(journal.count("init:Detail"), 2);
    assert_eq!(journal.count("render:Detail"), 2);
    assert_eq!(journal.count("destroy:Detail"), 1);
}

#[tokio::test]
async fn test_async_burst_only_last_mounts() {
    let journal = Journal::default();
    let app = racing_app(&journal);
    let mut events = app.subscribe();
    app.start(false).await.unwrap();

    app.history().push("/slow").unwrap();
    app.history().push("/fast").unwrap();
    app.history().push("/slow").unwrap();

    let event = common::next_event(&mut events).await;
    assert_eq!(event.location().pathname, "/slow");
    assert_eq!(app.container().html(), "slow");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(journal.count("render:Fast"), 0);
    assert_eq!(journal.count("render:Slow"), 1);
}

#[tokio::test]
async fn test_stop_abandons_pending_load() {
    let journal = Journal::default();
    let app = racing_app(&journal);
    app.start(false).await.unwrap();

    let (slow, ()) = tokio::join!(app.navigate("/slow"), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        app.stop();
    });

    assert!(matches!(slow, Err(AppError::Stopped)));
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(journal.count("init:Slow"), 0);
    assert_eq!(app.container().html(), "");
}

#[tokio::test]
async fn test_failure_of_superseded_navigation_is_silent() {
    let journal = Journal::default();
    let home = common::home(&journal);
    let app = App::builder()
        .container_handle(Arc::new(MemoryContainer::new("#root")))
        .route("/", "home")
        .route("/broken", "broken")
        .loader(move |id: &str| {
            let found = (id == "home").then(|| home.clone());
            Loaded::pending(async move {
                tokio::time::sleep(Duration::from_millis(if found.is_some() { 5 } else { 50 })).await;
                found.ok_or_else(|| ControllerError::new("chunk missing"))
            })
        })
        .build()
        .unwrap();
    let mut events = app.subscribe();
    app.start(false).await.unwrap();

    let (broken, home) = tokio::join!(app.navigate("/broken"), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        app.navigate("/").await
    });

    assert!(matches!(broken, Ok(NavigationOutcome::Superseded(_))));
    assert!(home.unwrap().is_mounted());

    let event = common::next_event(&mut events).await;
    assert!(event.is_mounted());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(events.try_recv().is_err());
}
