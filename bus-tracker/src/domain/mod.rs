//! Domain types for the bus tracker.
//!
//! These are validated, immutable values converted from backend responses.
//! Code that receives them does not need to re-check identifiers or
//! coordinates.

mod geo;
mod prediction;
mod route;
mod stop;
mod time;
mod vehicle;

pub use geo::{BoundingBox, UserLocation};
pub use prediction::Prediction;
pub use route::{Direction, Route, RouteId};
pub use stop::{Stop, StopId};
pub use time::{TimeError, format_arrival_time, to_twelve_hour};
pub use vehicle::VehiclePosition;
