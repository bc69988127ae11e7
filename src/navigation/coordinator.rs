//! Navigation coordinator.
//!
//! # Responsibilities
//! - Listen to history and turn every location change into a navigation
//! - Drive matcher and resolver, await loaders and controller init
//! - Own the mounted controller; destroy it exactly once
//! - Let only the latest navigation mount (token comparison)
//! - Notify subscribers in completion order
//!
//! # Data Flow
//! ```text
//! history listener / navigate / start
//!     → Command::Navigate (unbounded inbox)
//!     → driver task: issue token t, state = Resolving(t)
//!     → poll once; a navigation that does not suspend finishes right here
//!     → otherwise in_flight (FuturesUnordered):
//!         match → resolve → [await loader] → check t
//!         → state = Mounting(t) → construct → await init → check t
//!     → finish:
//!         Ready      → mount: check t, destroy previous, render, Mounted(t)
//!         Superseded → dropped silently
//!         Failed     → event, previous controller kept
//!     → reply to the navigation's caller, if any
//! ```
//!
//! # Design Decisions
//! - One driver task performs every mount, destroy and notification
//! - Nothing is cancelled; stale results are discarded on arrival
//! - Only the loader and `init` suspend a navigation; a synchronous one
//!   mounts before the next command is read
//! - The token is checked again under the mounted lock, so `stop` and `mount`
//!   cannot both see the same controller
//! - A controller that finished init but lost the race is dropped without
//!   `destroy`; `destroy` pairs with mount

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Instant;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::controller::{Controller, ControllerContext, Resolution, Resolver};
use crate::error::AppError;
use crate::history::{History, ListenerId, Location};
use crate::lifecycle::StopSignal;
use crate::navigation::handle::ControllerHandle;
use crate::navigation::{NavigationEvent, NavigationState, NavigationToken, TokenIssuer};
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::view::Container;

type Reply = oneshot::Sender<Result<NavigationOutcome, AppError>>;

/// Work queued for the driver task.
pub(crate) enum Command {
    Navigate {
        location: Location,
        reply: Option<Reply>,
    },
    Refresh {
        token: NavigationToken,
    },
}

/// How a navigation that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A controller was mounted for the location.
    Mounted(Location),
    /// A newer navigation won; nothing was mounted for this one.
    Superseded(Location),
}

impl NavigationOutcome {
    pub fn location(&self) -> &Location {
        match self {
            Self::Mounted(location) | Self::Superseded(location) => location,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }
}

pub(crate) struct MountedController {
    pub(crate) token: NavigationToken,
    controller: Box<dyn Controller>,
    pub(crate) context: ControllerContext,
}

/// A controller that finished init and may be mounted.
struct Ready {
    controller: Box<dyn Controller>,
    context: ControllerContext,
    route: String,
}

/// Result of an in-flight navigation, handed back to the driver.
struct Prepared {
    token: NavigationToken,
    location: Location,
    started: Instant,
    reply: Option<Reply>,
    result: Result<Option<Ready>, AppError>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct Shared {
    table: Arc<RouteTable>,
    resolver: Resolver,
    history: Arc<dyn History>,
    container: Arc<dyn Container>,
    tokens: TokenIssuer,
    state: Mutex<NavigationState>,
    mounted: Mutex<Option<MountedController>>,
    events: broadcast::Sender<NavigationEvent>,
    commands: mpsc::UnboundedSender<Command>,
    inbox: Mutex<Option<mpsc::UnboundedReceiver<Command>>>,
    listener: Mutex<Option<ListenerId>>,
    /// Reply for the navigation `navigate` is pushing, keyed by the pushing thread.
    pending_reply: Mutex<Option<(ThreadId, Reply)>>,
    navigate_lock: Mutex<()>,
    /// Thread currently running a controller's `render` or `destroy`.
    callback_thread: Mutex<Option<ThreadId>>,
    started: AtomicBool,
    stop: StopSignal,
}

impl Shared {
    fn advance(&self, next: NavigationState) {
        lock(&self.state).advance(next);
    }

    fn advance_if_current(&self, token: NavigationToken, next: NavigationState) -> bool {
        let mut state = lock(&self.state);
        if !self.tokens.is_current(token) || state.is_stopped() {
            return false;
        }
        state.advance(next);
        true
    }

    fn emit(&self, event: NavigationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Queue a navigation for a location reported by history.
    fn enqueue(&self, location: Location) {
        let reply = {
            let mut pending = lock(&self.pending_reply);
            match pending.as_ref() {
                Some((owner, _)) if *owner == thread::current().id() => pending.take().map(|(_, reply)| reply),
                _ => None,
            }
        };

        tracing::debug!(path = %location.path(), action = ?location.action, key = %location.key, "Location changed");

        if self.commands.send(Command::Navigate { location, reply }).is_err() {
            tracing::warn!("Navigation dropped: coordinator is not running");
        }
    }

    /// Re-render the mounted controller into a cleared container.
    ///
    /// With a token, only the controller mounted for that token is rendered.
    pub(crate) fn refresh(&self, token: Option<NavigationToken>) -> bool {
        if self.is_in_callback() {
            tracing::warn!("Refresh requested from inside render or destroy ignored");
            return false;
        }
        let mounted = lock(&self.mounted);
        let Some(current) = mounted.as_ref() else {
            return false;
        };
        if token.is_some_and(|t| t != current.token) {
            tracing::debug!(token = ?token, mounted = %current.token, "Refresh ignored for a controller that is no longer mounted");
            return false;
        }

        let html = self.in_callback(|| current.controller.render(&current.context));
        self.container.clear();
        self.container.set_html(&html);
        tracing::debug!(token = %current.token, "View refreshed");
        true
    }

    /// Run a controller callback while the mounted lock is held.
    fn in_callback<R>(&self, callback: impl FnOnce() -> R) -> R {
        *lock(&self.callback_thread) = Some(thread::current().id());
        let result = callback();
        *lock(&self.callback_thread) = None;
        result
    }

    /// Whether the current thread is inside `render` or `destroy` under the
    /// mounted lock. Taking that lock again here would deadlock.
    pub(crate) fn is_in_callback(&self) -> bool {
        *lock(&self.callback_thread) == Some(thread::current().id())
    }

    pub(crate) fn mounted_token(&self) -> Option<NavigationToken> {
        lock(&self.mounted).as_ref().map(|m| m.token)
    }

    fn begin(self: &Arc<Self>, location: Location, reply: Option<Reply>) -> BoxFuture<'static, Prepared> {
        let token = self.tokens.issue();
        self.advance(NavigationState::Resolving(token));
        tracing::debug!(token = %token, path = %location.path(), "Navigation started");
        self.clone().prepare(token, location, reply).boxed()
    }

    async fn prepare(self: Arc<Self>, token: NavigationToken, location: Location, reply: Option<Reply>) -> Prepared {
        let started = Instant::now();
        let result = self.resolve_and_init(token, &location).await;
        Prepared {
            token,
            location,
            started,
            reply,
            result,
        }
    }

    async fn resolve_and_init(&self, token: NavigationToken, location: &Location) -> Result<Option<Ready>, AppError> {
        let route_match = self.table.match_path(&location.pathname)?;

        let controller_type = match self.resolver.resolve(route_match.route.controller())? {
            Resolution::Ready(controller_type) => controller_type,
            Resolution::Pending(pending) => {
                tracing::debug!(token = %token, controller = %pending.controller(), "Waiting for loader");
                let controller_type = pending.settle().await?;
                if !self.tokens.is_current(token) {
                    tracing::debug!(token = %token, "Loader settled for a superseded navigation");
                    return Ok(None);
                }
                controller_type
            }
        };

        if !self.advance_if_current(token, NavigationState::Mounting(token)) {
            return Ok(None);
        }

        let route = route_match.route.pattern().source().to_string();
        let context = ControllerContext::new(
            token,
            location.clone(),
            route_match,
            self.container.clone(),
            self.history.clone(),
            self.commands.clone(),
        );
        let mut controller = controller_type.instantiate(&context);

        tracing::debug!(token = %token, controller = %controller_type.name(), "Initializing controller");
        controller
            .init(&context)
            .await
            .map_err(|e| AppError::InitFailure {
                path: location.path(),
                message: e.to_string(),
            })?;

        if !self.tokens.is_current(token) {
            tracing::debug!(token = %token, controller = %controller_type.name(), "Init finished for a superseded navigation");
            return Ok(None);
        }

        Ok(Some(Ready {
            controller,
            context,
            route,
        }))
    }

    fn finish(&self, prepared: Prepared) {
        let Prepared {
            token,
            location,
            started,
            reply,
            result,
        } = prepared;

        let outcome = match result {
            Ok(Some(ready)) => Ok(self.mount(token, location, ready, started)),
            Ok(None) => Ok(self.superseded(token, location, started)),
            Err(err) if self.tokens.is_current(token) && !self.stop.is_triggered() => {
                Err(self.fail(token, location, err, started))
            }
            Err(err) => {
                tracing::debug!(token = %token, error = %err, "Failure of a superseded navigation ignored");
                Ok(self.superseded(token, location, started))
            }
        };

        if let Some(reply) = reply {
            let _ = reply.send(outcome);
        }
    }

    fn superseded(&self, token: NavigationToken, location: Location, started: Instant) -> NavigationOutcome {
        tracing::debug!(token = %token, path = %location.path(), "Navigation superseded");
        metrics::record_navigation("superseded", started);
        NavigationOutcome::Superseded(location)
    }

    fn mount(&self, token: NavigationToken, location: Location, ready: Ready, started: Instant) -> NavigationOutcome {
        let Ready {
            controller,
            context,
            route,
        } = ready;

        {
            let mut mounted = lock(&self.mounted);
            if !self.tokens.is_current(token) || self.stop.is_triggered() {
                drop(mounted);
                return self.superseded(token, location, started);
            }

            if let Some(mut previous) = mounted.take() {
                self.in_callback(|| previous.controller.destroy(&previous.context));
                metrics::record_destroyed();
                tracing::debug!(token = %previous.token, "Previous controller destroyed");
            }

            let html = self.in_callback(|| controller.render(&context));
            self.container.clear();
            self.container.set_html(&html);

            *mounted = Some(MountedController {
                token,
                controller,
                context,
            });
            self.advance(NavigationState::Mounted(token));
        }

        tracing::info!(
            token = %token,
            path = %location.path(),
            route = %route,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Controller mounted"
        );
        metrics::record_navigation("mounted", started);

        self.emit(NavigationEvent::Mounted {
            token,
            location: location.clone(),
            route,
        });
        NavigationOutcome::Mounted(location)
    }

    fn fail(&self, token: NavigationToken, location: Location, err: AppError, started: Instant) -> AppError {
        let (event, outcome) = match &err {
            AppError::NoRouteMatch(_) => (
                NavigationEvent::NotFound {
                    token,
                    location: location.clone(),
                },
                "not_found",
            ),
            AppError::LoaderFailure { controller, message } => (
                NavigationEvent::LoaderFailed {
                    token,
                    location: location.clone(),
                    controller: controller.clone(),
                    message: message.clone(),
                },
                "loader_failed",
            ),
            AppError::LoaderMissing { controller } => (
                NavigationEvent::LoaderFailed {
                    token,
                    location: location.clone(),
                    controller: controller.clone(),
                    message: err.to_string(),
                },
                "loader_failed",
            ),
            other => (
                NavigationEvent::InitFailed {
                    token,
                    location: location.clone(),
                    message: match other {
                        AppError::InitFailure { message, .. } => message.clone(),
                        _ => other.to_string(),
                    },
                },
                "init_failed",
            ),
        };

        let restored = match self.mounted_token() {
            Some(previous) => NavigationState::Mounted(previous),
            None => NavigationState::Idle,
        };
        self.advance(restored);

        tracing::warn!(token = %token, path = %location.path(), error = %err, "Navigation failed");
        metrics::record_navigation(outcome, started);
        self.emit(event);
        err
    }
}

/// The driver task: the only place controllers are mounted.
async fn run(
    shared: Arc<Shared>,
    mut inbox: mpsc::UnboundedReceiver<Command>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut in_flight: FuturesUnordered<BoxFuture<'static, Prepared>> = FuturesUnordered::new();

    tracing::debug!("Navigation driver started");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                break;
            }

            command = inbox.recv() => {
                match command {
                    Some(Command::Navigate { location, reply }) => {
                        let mut navigation = shared.begin(location, reply);
                        match (&mut navigation).now_or_never() {
                            Some(prepared) => shared.finish(prepared),
                            None => in_flight.push(navigation),
                        }
                    }
                    Some(Command::Refresh { token }) => {
                        shared.refresh(Some(token));
                    }
                    None => break,
                }
            }

            Some(prepared) = in_flight.next(), if !in_flight.is_empty() => {
                shared.finish(prepared);
            }
        }
    }

    tracing::debug!(abandoned = in_flight.len(), "Navigation driver stopped");
}

/// Owns the navigation state machine for one app.
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Coordinator {
    pub fn new(
        table: Arc<RouteTable>,
        resolver: Resolver,
        history: Arc<dyn History>,
        container: Arc<dyn Container>,
        events_capacity: usize,
    ) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(events_capacity.max(1));

        Self {
            shared: Arc::new(Shared {
                table,
                resolver,
                history,
                container,
                tokens: TokenIssuer::new(),
                state: Mutex::new(NavigationState::Idle),
                mounted: Mutex::new(None),
                events,
                commands,
                inbox: Mutex::new(Some(inbox)),
                listener: Mutex::new(None),
                pending_reply: Mutex::new(None),
                navigate_lock: Mutex::new(()),
                callback_thread: Mutex::new(None),
                started: AtomicBool::new(false),
                stop: StopSignal::new(),
            }),
        }
    }

    /// Spawn the driver and listen to history.
    ///
    /// With `match_current`, also navigates to the current location and
    /// returns once that navigation finished. Must run inside a tokio runtime.
    pub async fn start(&self, match_current: bool) -> Result<(), AppError> {
        let shared = &self.shared;
        if shared.stop.is_triggered() {
            return Err(AppError::Stopped);
        }
        if shared.started.swap(true, Ordering::SeqCst) {
            return Err(AppError::AlreadyStarted);
        }
        let inbox = lock(&shared.inbox).take().ok_or(AppError::AlreadyStarted)?;

        tokio::spawn(run(shared.clone(), inbox, shared.stop.subscribe()));

        let weak = Arc::downgrade(shared);
        let id = shared.history.listen(Arc::new(move |location: &Location| {
            if let Some(shared) = weak.upgrade() {
                shared.enqueue(location.clone());
            }
        }));
        *lock(&shared.listener) = Some(id);

        tracing::info!(
            history = ?shared.history.kind(),
            container = %shared.container.selector(),
            routes = shared.table.len(),
            match_current,
            "Router started"
        );

        if !match_current {
            return Ok(());
        }

        let (tx, rx) = oneshot::channel();
        shared
            .commands
            .send(Command::Navigate {
                location: shared.history.location(),
                reply: Some(tx),
            })
            .map_err(|_| AppError::Stopped)?;

        rx.await.unwrap_or(Err(AppError::Stopped)).map(|_| ())
    }

    /// Push `path` to history and wait for the resulting navigation.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome, AppError> {
        self.ensure_running()?;
        let shared = &self.shared;

        let (tx, rx) = oneshot::channel();
        {
            let _guard = lock(&shared.navigate_lock);
            *lock(&shared.pending_reply) = Some((thread::current().id(), tx));
            let pushed = shared.history.push(path);
            let leftover = lock(&shared.pending_reply).take();
            pushed?;
            if leftover.is_some() {
                return Err(AppError::NotListening);
            }
        }

        rx.await.unwrap_or(Err(AppError::Stopped))
    }

    /// Re-render the mounted controller. Returns false when nothing is mounted.
    pub fn render(&self) -> bool {
        self.shared.refresh(None)
    }

    /// Stop processing navigations and destroy the mounted controller.
    ///
    /// Idempotent.
    pub fn stop(&self) {
        let shared = &self.shared;
        if !shared.stop.trigger() {
            return;
        }

        // Invalidate every in-flight navigation.
        shared.tokens.issue();

        if let Some(id) = lock(&shared.listener).take() {
            shared.history.unlisten(id);
        }

        let previous = lock(&shared.mounted).take();
        *lock(&shared.state) = NavigationState::Stopped;

        if let Some(mut previous) = previous {
            previous.controller.destroy(&previous.context);
            metrics::record_destroyed();
            tracing::debug!(token = %previous.token, "Controller destroyed on stop");
        }

        tracing::info!("Router stopped");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.shared.events.subscribe()
    }

    pub fn state(&self) -> NavigationState {
        *lock(&self.shared.state)
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.shared.history
    }

    pub fn container(&self) -> &Arc<dyn Container> {
        &self.shared.container
    }

    pub fn routes(&self) -> &RouteTable {
        &self.shared.table
    }

    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stop.is_triggered()
    }

    /// Handle to the mounted controller.
    ///
    /// `None` when called from a controller's `render` or `destroy`.
    pub fn controller(&self) -> Option<ControllerHandle> {
        if self.shared.is_in_callback() {
            return None;
        }
        let mounted = lock(&self.shared.mounted);
        mounted
            .as_ref()
            .map(|m| ControllerHandle::new(m.context.clone(), Arc::downgrade(&self.shared)))
    }

    fn ensure_running(&self) -> Result<(), AppError> {
        if self.shared.stop.is_triggered() {
            return Err(AppError::Stopped);
        }
        if !self.shared.started.load(Ordering::SeqCst) {
            return Err(AppError::NotStarted);
        }
        Ok(())
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}
