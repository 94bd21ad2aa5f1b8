//! Geographic coordinates and bounding boxes.

use serde::Serialize;

/// A WGS84 coordinate reported for the rider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lon: f64,
}

impl UserLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse a `"lat,lon"` pair, as used by the `BUS_TRACKER_LOCATION`
    /// environment variable.
    ///
    /// ```
    /// use bus_tracker::domain::UserLocation;
    ///
    /// let loc = UserLocation::parse_pair("41.9, -87.6").unwrap();
    /// assert_eq!(loc, UserLocation::new(41.9, -87.6));
    ///
    /// assert!(UserLocation::parse_pair("41.9").is_none());
    /// assert!(UserLocation::parse_pair("91,0").is_none());
    /// ```
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// An axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// The degenerate box covering a single point.
    pub fn around(lat: f64, lon: f64) -> Self {
        Self {
            south: lat,
            west: lon,
            north: lat,
            east: lon,
        }
    }

    /// Grow the box just enough to cover a point.
    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
        self.west = self.west.min(lon);
        self.east = self.east.max(lon);
    }

    /// Expand every side by `margin` degrees.
    pub fn padded(self, margin: f64) -> Self {
        Self {
            south: self.south - margin,
            west: self.west - margin,
            north: self.north + margin,
            east: self.east + margin,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}
