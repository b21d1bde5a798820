//! Haversine great-circle distance.

use sentinel_types::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between `a` and `b` in meters.
///
/// Inputs are degrees. Out-of-range or non-finite input yields an unspecified
/// (possibly NaN) result rather than a panic; callers sanitize coordinates.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    // Absolute deltas keep the result bit-identical under argument swap.
    let d_lat = (b.latitude - a.latitude).abs().to_radians();
    let d_lon = (b.longitude - a.longitude).abs().to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}
