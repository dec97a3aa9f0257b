//! Great-circle geometry on a spherical Earth

use crate::core::{Distance, Position, Speed, EARTH_RADIUS_KM, MS_PER_HOUR};

/// Haversine distance between two positions (km)
///
/// Symmetric in its arguments and exactly zero for identical positions.
/// The antipodal case is not special-cased.
pub fn distance(a: &Position, b: &Position) -> Distance {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Convert a distance covered over `interval_ms` into km/h
pub fn speed_from_distance(distance_km: Distance, interval_ms: f64) -> Speed {
    distance_km / interval_ms * MS_PER_HOUR
}

/// Point reached after travelling `distance_km` from `start` on the initial
/// `bearing_deg` (clockwise from north)
pub fn destination(start: &Position, bearing_deg: f64, distance_km: Distance) -> Position {
    let lat1 = start.lat.to_radians();
    let lon1 = start.lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Position {
        lat: lat2.to_degrees(),
        lon: normalize_longitude(lon2.to_degrees()),
    }
}

fn normalize_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}
