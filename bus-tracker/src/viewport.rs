//! Map viewport fitting.
//!
//! The map holds no state of its own: its framing is a pure function of
//! the vehicles on screen and the rider's location.

use crate::domain::{BoundingBox, UserLocation, VehiclePosition};

/// Margin added on every side of the fitted box, in degrees.
pub const VIEWPORT_PADDING_DEGREES: f64 = 0.01;

/// Fit a viewport around every vehicle and the rider.
///
/// Returns `None` when there are no vehicles or no rider location; the map
/// then keeps whatever framing it had.
pub fn fit(vehicles: &[VehiclePosition], user: Option<UserLocation>) -> Option<BoundingBox> {
    let user = user?;
    if vehicles.is_empty() {
        return None;
    }

    let mut bbox = BoundingBox::around(user.lat, user.lon);
    for v in vehicles {
        bbox.extend(v.lat, v.lon);
    }
    Some(bbox.padded(VIEWPORT_PADDING_DEGREES))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = (f64, f64)> {
        (41.0f64..43.0, -88.5f64..-87.0)
    }

    proptest! {
        /// The fitted box contains every input point, with the padding to spare
        #[test]
        fn contains_all_points(
            points in proptest::collection::vec(coordinate(), 1..20),
            user in coordinate(),
        ) {
            let vehicles: Vec<VehiclePosition> = points
                .iter()
                .enumerate()
                .map(|(i, &(lat, lon))| VehiclePosition {
                    vehicle_id: i.to_string(),
                    lat,
                    lon,
                    heading_degrees: 0.0,
                    destination_label: String::new(),
                })
                .collect();
            let bbox = fit(&vehicles, Some(UserLocation::new(user.0, user.1))).unwrap();
            let margin = VIEWPORT_PADDING_DEGREES - 1e-9;

            for (lat, lon) in points.into_iter().chain(std::iter::once(user)) {
                prop_assert!(lat - bbox.south >= margin);
                prop_assert!(bbox.north - lat >= margin);
                prop_assert!(lon - bbox.west >= margin);
                prop_assert!(bbox.east - lon >= margin);
            }
        }
    }
}
