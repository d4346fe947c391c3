// Great-circle distance (haversine)

use super::Coordinate;

/// Mean Earth radius used for all distance figures
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance between two points in whole kilometres, rounded to nearest
///
/// Not tuned for near-antipodal pairs; terrestrial contacts stay well below
/// that range.
pub fn distance_km(a: Coordinate, b: Coordinate) -> u32 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c).round() as u32
}
