//! Conversion from backend DTOs to domain types.
//!
//! Records that cannot become valid domain values (empty ids, coordinates
//! that do not parse) are dropped individually with a warning, so one bad
//! record never empties a whole list.

use tracing::warn;

use crate::domain::{Direction, Prediction, Route, RouteId, Stop, StopId, VehiclePosition};

use super::types::{DirectionDto, PredictionDto, RouteDto, Scalar, StopDto, VehicleDto};

pub fn convert_routes(dtos: Vec<RouteDto>) -> Vec<Route> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = RouteId::new(dto.rt.into_text())?;
            Some(Route::new(id, dto.rtnm.unwrap_or_default()))
        })
        .collect()
}

pub fn convert_directions(dtos: Vec<DirectionDto>) -> Vec<Direction> {
    dtos.into_iter()
        .filter(|dto| !dto.dir.trim().is_empty())
        .map(|dto| Direction::new(dto.dir))
        .collect()
}

pub fn convert_stops(dtos: Vec<StopDto>) -> Vec<Stop> {
    dtos.into_iter()
        .filter_map(|dto| {
            let Some(id) = StopId::new(dto.stpid.into_text()) else {
                warn!(name = %dto.stpnm, "dropping stop without an id");
                return None;
            };
            Some(Stop::new(id, dto.stpnm))
        })
        .collect()
}

pub fn convert_vehicles(dtos: Vec<VehicleDto>) -> Vec<VehiclePosition> {
    dtos.into_iter().filter_map(convert_vehicle).collect()
}

fn convert_vehicle(dto: VehicleDto) -> Option<VehiclePosition> {
    let vehicle_id = dto.vid.into_text();
    let (Some(lat), Some(lon)) = (dto.lat.as_f64(), dto.lon.as_f64()) else {
        warn!(%vehicle_id, "dropping vehicle with unreadable coordinates");
        return None;
    };

    Some(VehiclePosition {
        vehicle_id,
        lat,
        lon,
        heading_degrees: dto.hdg.as_ref().and_then(Scalar::as_f64).unwrap_or(0.0),
        destination_label: dto.des.unwrap_or_default(),
    })
}

pub fn convert_predictions(dtos: Vec<PredictionDto>) -> Vec<Prediction> {
    dtos.into_iter()
        .map(|dto| Prediction {
            route: dto.rt.into_text(),
            destination_label: dto.rtdir,
            arrival_timestamp: dto.prdtm,
        })
        .collect()
}
