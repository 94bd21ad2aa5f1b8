//! The rider's session.
//!
//! A [`Session`] runs as a single task. It owns the [`QueryCascade`], turns
//! rider [`Action`]s into transitions, and polls every in-flight fetch
//! itself through a `FuturesUnordered`, so all state changes happen on this
//! one task and no locking is needed. After each accepted transition it
//! publishes a fresh [`View`] on a `watch` channel.
//!
//! Other tasks talk to the session through a cloneable [`SessionHandle`].

use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::cascade::{Fetch, Outcome, QueryCascade};
use crate::cta::TransitApi;
use crate::geolocation::{GeolocationResolver, LocationSource};
use crate::view::View;

/// Queued rider actions before senders wait.
const ACTION_BUFFER: usize = 32;

/// Something the rider did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Pick a route by id from the loaded route list.
    SelectRoute(String),
    /// Pick a direction from the loaded directions.
    SelectDirection(String),
    /// Pick a stop by id from the loaded stops.
    SelectStop(String),
    /// "Get Predictions".
    RequestPredictions,
    Reset,
}

/// Errors returned to callers of [`SessionHandle::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session task has ended
    #[error("session has stopped")]
    Closed,

    /// The action named something not in the currently loaded list
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

struct Request {
    action: Action,
    reply: oneshot::Sender<Result<View, SessionError>>,
}

/// Cloneable handle for driving a running session.
#[derive(Clone)]
pub struct SessionHandle {
    actions: mpsc::Sender<Request>,
    views: watch::Receiver<View>,
}

impl SessionHandle {
    /// Apply an action and return the view published right after its
    /// synchronous part (clearing, selection) took effect. Fetches it
    /// started complete later and publish their own views.
    pub async fn dispatch(&self, action: Action) -> Result<View, SessionError> {
        let (reply, response) = oneshot::channel();
        self.actions
            .send(Request { action, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    /// The most recently published view.
    pub fn current(&self) -> View {
        self.views.borrow().clone()
    }

    /// Subscribe to future views.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.views.clone()
    }
}

/// The session task's state.
pub struct Session<A, L> {
    cascade: QueryCascade,
    api: Arc<A>,
    locator: Arc<GeolocationResolver<L>>,
    actions: mpsc::Receiver<Request>,
    views: watch::Sender<View>,
    pending: FuturesUnordered<BoxFuture<'static, Outcome>>,
    revision: u64,
}

impl<A: TransitApi, L: LocationSource> Session<A, L> {
    /// Create a session and its handle. Nothing happens until [`run`] is
    /// polled.
    ///
    /// [`run`]: Session::run
    pub fn new(api: A, locator: GeolocationResolver<L>) -> (Self, SessionHandle) {
        Self::with_shared_api(Arc::new(api), locator)
    }

    /// Like [`new`](Session::new), for a backend client shared between
    /// sessions.
    pub fn with_shared_api(api: Arc<A>, locator: GeolocationResolver<L>) -> (Self, SessionHandle) {
        let cascade = QueryCascade::new();
        let (actions_tx, actions_rx) = mpsc::channel(ACTION_BUFFER);
        let (views_tx, views_rx) = watch::channel(View::from_state(cascade.state(), 0));

        let session = Self {
            cascade,
            api,
            locator: Arc::new(locator),
            actions: actions_rx,
            views: views_tx,
            pending: FuturesUnordered::new(),
            revision: 0,
        };
        let handle = SessionHandle {
            actions: actions_tx,
            views: views_rx,
        };
        (session, handle)
    }

    /// Create a session and spawn it onto the runtime.
    pub fn spawn(api: A, locator: GeolocationResolver<L>) -> SessionHandle {
        Self::spawn_shared(Arc::new(api), locator)
    }

    /// Create a session over a shared backend client and spawn it.
    pub fn spawn_shared(api: Arc<A>, locator: GeolocationResolver<L>) -> SessionHandle {
        let (session, handle) = Self::with_shared_api(api, locator);
        tokio::spawn(session.run());
        handle
    }

    /// Run until every handle has been dropped.
    pub async fn run(mut self) {
        let fetches = self.cascade.start();
        self.execute(fetches);

        loop {
            tokio::select! {
                request = self.actions.recv() => {
                    let Some(request) = request else { break };
                    let result = self.handle(request.action);
                    // The caller may have gone away; the transition stands.
                    let _ = request.reply.send(result);
                }
                Some(outcome) = self.pending.next(), if !self.pending.is_empty() => {
                    if self.cascade.apply(outcome) {
                        self.publish();
                    }
                }
            }
        }
        debug!(in_flight = self.pending.len(), "session stopped");
    }

    fn handle(&mut self, action: Action) -> Result<View, SessionError> {
        let fetches = match action {
            Action::SelectRoute(id) => {
                let route = self
                    .cascade
                    .state()
                    .route_by_id(&id)
                    .cloned()
                    .ok_or(SessionError::Unknown {
                        kind: "route",
                        value: id,
                    })?;
                vec![self.cascade.set_route(route)]
            }
            Action::SelectDirection(value) => {
                let direction = self
                    .cascade
                    .state()
                    .direction_by_value(&value)
                    .cloned()
                    .ok_or(SessionError::Unknown {
                        kind: "direction",
                        value,
                    })?;
                self.cascade.set_direction(direction)
            }
            Action::SelectStop(id) => {
                let stop = self
                    .cascade
                    .state()
                    .stop_by_id(&id)
                    .cloned()
                    .ok_or(SessionError::Unknown {
                        kind: "stop",
                        value: id,
                    })?;
                self.cascade.set_stop(stop);
                Vec::new()
            }
            Action::RequestPredictions => self.cascade.request_predictions().into_iter().collect(),
            Action::Reset => {
                self.cascade.reset();
                Vec::new()
            }
        };

        self.execute(fetches);
        Ok(self.publish())
    }

    fn execute(&mut self, fetches: Vec<Fetch>) {
        for fetch in fetches {
            debug!(?fetch, "issuing fetch");
            let api = Arc::clone(&self.api);
            let locator = Arc::clone(&self.locator);
            self.pending.push(Box::pin(run_fetch(api, locator, fetch)));
        }
    }

    fn publish(&mut self) -> View {
        self.revision += 1;
        let view = View::from_state(self.cascade.state(), self.revision);
        self.views.send_replace(view.clone());
        view
    }
}

/// Perform one fetch against the collaborators.
async fn run_fetch<A: TransitApi, L: LocationSource>(
    api: Arc<A>,
    locator: Arc<GeolocationResolver<L>>,
    fetch: Fetch,
) -> Outcome {
    match fetch {
        Fetch::Routes { token } => Outcome::Routes {
            token,
            result: api.routes().await,
        },
        Fetch::Directions { token, route } => Outcome::Directions {
            token,
            result: api.directions(&route).await,
        },
        Fetch::Stops {
            token,
            route,
            direction,
        } => Outcome::Stops {
            token,
            result: api.stops(&route, &direction).await,
        },
        Fetch::Vehicles { token, route } => Outcome::Vehicles {
            token,
            result: api.vehicles(&route).await,
        },
        Fetch::Predictions { token, route, stop } => Outcome::Predictions {
            token,
            result: api.predictions(&route, &stop).await,
        },
        Fetch::Location { token } => Outcome::Location {
            token,
            location: locator.resolve().await,
        },
    }
}
