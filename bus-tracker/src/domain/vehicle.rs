//! Live vehicle positions.

use serde::Serialize;

/// A bus on a route, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePosition {
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
    /// Compass heading, degrees clockwise from north.
    pub heading_degrees: f64,
    pub destination_label: String,
}
