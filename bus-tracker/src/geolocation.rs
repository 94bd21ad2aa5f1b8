//! Rider location resolution.
//!
//! A [`LocationSource`] either reports a coordinate or fails. The
//! [`GeolocationResolver`] never fails: when the source does, it logs and
//! answers with a fallback coordinate in the city centre.
//!
//! Normally the rider's own browser supplies the position through a
//! [`LocationReporter`]; a [`ConfiguredLocation`] overrides that for the
//! whole server.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::UserLocation;

/// Default fallback: downtown Chicago.
pub const FALLBACK_LOCATION: UserLocation = UserLocation {
    lat: 41.8781,
    lon: -87.6298,
};

/// Why a location source could not produce a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    /// The rider refused to share their location
    #[error("location permission denied")]
    Denied,

    /// No position could be obtained
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Something that can report the rider's position.
pub trait LocationSource: Send + Sync + 'static {
    fn locate(&self) -> impl Future<Output = Result<UserLocation, GeolocationError>> + Send;
}

/// How long a session waits for the browser to report a position.
pub const BROWSER_LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Server-wide location override chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfiguredLocation {
    /// Always reports this coordinate.
    Fixed(UserLocation),
    /// Never reports a coordinate; the fallback is always used.
    Unavailable,
}

impl LocationSource for ConfiguredLocation {
    async fn locate(&self) -> Result<UserLocation, GeolocationError> {
        match self {
            ConfiguredLocation::Fixed(location) => Ok(*location),
            ConfiguredLocation::Unavailable => Err(GeolocationError::Unavailable(
                "no location configured".to_string(),
            )),
        }
    }
}

type Report = Option<Result<UserLocation, GeolocationError>>;

/// A position reported by the rider's browser.
///
/// Waits for the first report from the paired [`LocationReporter`]. No
/// report within the timeout, or a reporter dropped without reporting,
/// counts as unavailable.
#[derive(Debug, Clone)]
pub struct BrowserLocation {
    reports: watch::Receiver<Report>,
    timeout: Duration,
}

/// The web layer's half of a [`BrowserLocation`].
#[derive(Debug)]
pub struct LocationReporter {
    reports: watch::Sender<Report>,
}

impl BrowserLocation {
    /// Create a source and the reporter that feeds it.
    pub fn channel() -> (Self, LocationReporter) {
        let (tx, rx) = watch::channel(None);
        let source = Self {
            reports: rx,
            timeout: BROWSER_LOCATION_TIMEOUT,
        };
        (source, LocationReporter { reports: tx })
    }

    /// Set how long to wait for a report.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl LocationReporter {
    /// Pass on what the browser's geolocation API said. Only the first
    /// report is used by a waiting lookup; later ones replace it for
    /// lookups that have not happened yet.
    pub fn report(&self, report: Result<UserLocation, GeolocationError>) {
        self.reports.send_replace(Some(report));
    }
}

impl LocationSource for BrowserLocation {
    async fn locate(&self) -> Result<UserLocation, GeolocationError> {
        let mut reports = self.reports.clone();
        match tokio::time::timeout(self.timeout, reports.wait_for(Option::is_some)).await {
            Ok(Ok(report)) => report.clone().unwrap_or_else(|| {
                Err(GeolocationError::Unavailable("no report".to_string()))
            }),
            Ok(Err(_)) => Err(GeolocationError::Unavailable(
                "browser never reported a position".to_string(),
            )),
            Err(_) => Err(GeolocationError::Unavailable(
                "timed out waiting for the browser".to_string(),
            )),
        }
    }
}

/// Where a rider session takes its position from.
#[derive(Debug, Clone)]
pub enum RiderLocation {
    Configured(ConfiguredLocation),
    Browser(BrowserLocation),
}

impl LocationSource for RiderLocation {
    async fn locate(&self) -> Result<UserLocation, GeolocationError> {
        match self {
            RiderLocation::Configured(source) => source.locate().await,
            RiderLocation::Browser(source) => source.locate().await,
        }
    }
}

/// Resolves the rider's position, falling back on failure.
#[derive(Debug, Clone)]
pub struct GeolocationResolver<S> {
    source: S,
    fallback: UserLocation,
}

impl<S: LocationSource> GeolocationResolver<S> {
    /// Create a resolver with the default city-centre fallback.
    pub fn new(source: S) -> Self {
        Self {
            source,
            fallback: FALLBACK_LOCATION,
        }
    }

    /// Use a different fallback coordinate.
    pub fn with_fallback(mut self, fallback: UserLocation) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> UserLocation {
        self.fallback
    }

    /// Resolve the rider's position. Never fails.
    pub async fn resolve(&self) -> UserLocation {
        match self.source.locate().await {
            Ok(location) => {
                info!(lat = location.lat, lon = location.lon, "resolved rider location");
                location
            }
            Err(e) => {
                warn!(error = %e, "geolocation failed, using fallback");
                self.fallback
            }
        }
    }
}
