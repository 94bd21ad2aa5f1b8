//! The seam between the cascade and the transit backend.

use std::future::Future;

use crate::domain::{Direction, Prediction, Route, RouteId, Stop, StopId, VehiclePosition};

use super::error::CtaError;

/// Source of transit data.
///
/// Implemented by [`CtaClient`](super::CtaClient) over HTTP. Returned
/// futures must be `Send` so the session can be spawned onto the runtime.
pub trait TransitApi: Send + Sync + 'static {
    /// All routes the backend serves.
    fn routes(&self) -> impl Future<Output = Result<Vec<Route>, CtaError>> + Send;

    /// Directions of travel for a route.
    fn directions(
        &self,
        route: &RouteId,
    ) -> impl Future<Output = Result<Vec<Direction>, CtaError>> + Send;

    /// Stops served by a route in one direction.
    fn stops(
        &self,
        route: &RouteId,
        direction: &Direction,
    ) -> impl Future<Output = Result<Vec<Stop>, CtaError>> + Send;

    /// Live positions of every bus currently on a route.
    fn vehicles(
        &self,
        route: &RouteId,
    ) -> impl Future<Output = Result<Vec<VehiclePosition>, CtaError>> + Send;

    /// Arrival predictions for a route at a stop.
    fn predictions(
        &self,
        route: &RouteId,
        stop: &StopId,
    ) -> impl Future<Output = Result<Vec<Prediction>, CtaError>> + Send;
}
