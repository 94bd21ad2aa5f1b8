//! Scripted in-memory backend for tests.
//!
//! Each request is answered from a script keyed by its parameters. Replies
//! can be delayed so tests can make responses complete out of order;
//! combine with `#[tokio::test(start_paused = true)]` for determinism.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{Direction, Prediction, Route, RouteId, Stop, StopId, VehiclePosition};

use super::api::TransitApi;
use super::error::CtaError;

/// A scripted answer to one request.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    result: Result<Vec<T>, String>,
    delay: Duration,
}

impl<T> Reply<T> {
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            result: Ok(items),
            delay: Duration::ZERO,
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            delay: Duration::ZERO,
        }
    }

    /// Delay the reply by `ms` milliseconds.
    pub fn after(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    async fn deliver(self) -> Result<Vec<T>, CtaError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.map_err(CtaError::Backend)
    }
}

#[derive(Default)]
struct Script {
    routes: Option<Reply<Route>>,
    directions: HashMap<String, Reply<Direction>>,
    stops: HashMap<(String, String), Reply<Stop>>,
    vehicles: HashMap<String, Reply<VehiclePosition>>,
    predictions: HashMap<(String, String), Reply<Prediction>>,
    calls: Vec<String>,
}

/// In-memory [`TransitApi`] answering from a script.
///
/// Unscripted requests fail with a backend error.
#[derive(Clone, Default)]
pub struct MockTransit {
    script: Arc<Mutex<Script>>,
}

impl MockTransit {
    pub fn new() -> Self {
        Self::default()
    }

    fn edit(&self, f: impl FnOnce(&mut Script)) {
        let mut script = self.script.lock().unwrap();
        f(&mut script);
    }

    /// Record a call and look up its reply.
    fn answer<T: Clone>(
        &self,
        call: String,
        find: impl FnOnce(&Script) -> Option<Reply<T>>,
    ) -> Reply<T> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call.clone());
        find(&script).unwrap_or_else(|| Reply::err(&format!("unscripted: {call}")))
    }

    pub fn set_routes(&self, reply: Reply<Route>) {
        self.edit(|s| s.routes = Some(reply));
    }

    pub fn set_directions(&self, route: &str, reply: Reply<Direction>) {
        self.edit(|s| {
            s.directions.insert(route.to_string(), reply);
        });
    }

    pub fn set_stops(&self, route: &str, direction: &str, reply: Reply<Stop>) {
        self.edit(|s| {
            s.stops
                .insert((route.to_string(), direction.to_string()), reply);
        });
    }

    pub fn set_vehicles(&self, route: &str, reply: Reply<VehiclePosition>) {
        self.edit(|s| {
            s.vehicles.insert(route.to_string(), reply);
        });
    }

    pub fn set_predictions(&self, route: &str, stop: &str, reply: Reply<Prediction>) {
        self.edit(|s| {
            s.predictions
                .insert((route.to_string(), stop.to_string()), reply);
        });
    }

    /// Requests received so far, e.g. `"stops 22 Northbound"`.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }
}

impl TransitApi for MockTransit {
    async fn routes(&self) -> Result<Vec<Route>, CtaError> {
        self.answer("routes".to_string(), |s| s.routes.clone())
            .deliver()
            .await
    }

    async fn directions(&self, route: &RouteId) -> Result<Vec<Direction>, CtaError> {
        self.answer(format!("directions {route}"), |s| {
            s.directions.get(route.as_str()).cloned()
        })
        .deliver()
        .await
    }

    async fn stops(&self, route: &RouteId, direction: &Direction) -> Result<Vec<Stop>, CtaError> {
        let key = (route.to_string(), direction.to_string());
        self.answer(format!("stops {route} {direction}"), |s| {
            s.stops.get(&key).cloned()
        })
        .deliver()
        .await
    }

    async fn vehicles(&self, route: &RouteId) -> Result<Vec<VehiclePosition>, CtaError> {
        self.answer(format!("vehicles {route}"), |s| {
            s.vehicles.get(route.as_str()).cloned()
        })
        .deliver()
        .await
    }

    async fn predictions(
        &self,
        route: &RouteId,
        stop: &StopId,
    ) -> Result<Vec<Prediction>, CtaError> {
        let key = (route.to_string(), stop.to_string());
        self.answer(format!("predictions {route} {stop}"), |s| {
            s.predictions.get(&key).cloned()
        })
        .deliver()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_and_unscripted_replies() {
        let mock = MockTransit::new();
        mock.set_directions("22", Reply::ok(vec![Direction::new("Northbound")]));

        let route = RouteId::new("22").unwrap();
        let dirs = mock.directions(&route).await.unwrap();
        assert_eq!(dirs, vec![Direction::new("Northbound")]);

        let other = RouteId::new("8").unwrap();
        assert!(mock.directions(&other).await.is_err());

        assert_eq!(mock.calls(), vec!["directions 22", "directions 8"]);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_reply_waits() {
        let mock = MockTransit::new();
        mock.set_routes(Reply::ok(vec![]).after(500));

        let start = tokio::time::Instant::now();
        mock.routes().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
