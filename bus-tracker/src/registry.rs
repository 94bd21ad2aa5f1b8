//! One session per rider.
//!
//! Every page load opens a fresh [`Session`] under a new random id, which
//! the web layer hands to the browser as a cookie. Later requests find
//! their session by that id. Sessions idle for longer than the timeout are
//! dropped, which stops their tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cta::TransitApi;
use crate::domain::UserLocation;
use crate::geolocation::{
    BrowserLocation, ConfiguredLocation, GeolocationError, GeolocationResolver, LocationReporter,
    RiderLocation,
};
use crate::session::{Session, SessionHandle};

/// Default time after which an untouched session is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

type Spawner = Box<dyn Fn(RiderLocation) -> SessionHandle + Send + Sync>;

struct RiderSession {
    handle: SessionHandle,
    /// `None` when a configured location overrides the browser's.
    reporter: Option<LocationReporter>,
    last_seen: Instant,
}

/// All live rider sessions, sharing one backend client.
pub struct SessionRegistry {
    spawn: Spawner,
    location: Option<ConfiguredLocation>,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<String, RiderSession>>,
}

impl SessionRegistry {
    /// Create a registry whose sessions query `api`.
    ///
    /// With `location` set, every session uses it instead of waiting for
    /// the browser to report a position.
    pub fn new<A: TransitApi>(api: A, location: Option<ConfiguredLocation>) -> Self {
        let api = Arc::new(api);
        Self {
            spawn: Box::new(move |source: RiderLocation| {
                Session::spawn_shared(Arc::clone(&api), GeolocationResolver::new(source))
            }),
            location,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Set how long a session may go untouched.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Start a fresh session for a page load.
    ///
    /// The session this browser had before, if any, is dropped. Returns the
    /// new session's id and handle.
    pub async fn open(&self, previous: Option<&str>) -> (String, SessionHandle) {
        let (source, reporter) = match self.location {
            Some(configured) => (RiderLocation::Configured(configured), None),
            None => {
                let (source, reporter) = BrowserLocation::channel();
                (RiderLocation::Browser(source), Some(reporter))
            }
        };
        let handle = (self.spawn)(source);
        let id = new_session_id();
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        if previous.is_some_and(|previous| sessions.remove(previous).is_some()) {
            debug!("dropped session replaced by a page load");
        }
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "dropped idle sessions");
        }

        sessions.insert(
            id.clone(),
            RiderSession {
                handle: handle.clone(),
                reporter,
                last_seen: now,
            },
        );
        info!(active = sessions.len(), "rider session opened");
        (id, handle)
    }

    /// Find a live session by id.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;
        session.last_seen = Instant::now();
        Some(session.handle.clone())
    }

    /// Pass the browser's geolocation answer to a session.
    ///
    /// Returns `false` if there is no such session. Ignored when a configured
    /// location is in force.
    pub async fn report_location(
        &self,
        id: &str,
        report: Result<UserLocation, GeolocationError>,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(id) else {
            return false;
        };
        session.last_seen = Instant::now();
        if let Some(reporter) = &session.reporter {
            reporter.report(report);
        }
        true
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn new_session_id() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}
