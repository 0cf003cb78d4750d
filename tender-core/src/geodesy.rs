//! Great circle computations on a spherical earth.

use geo::{Bearing, Destination, Distance, HaversineMeasure, Point, point};

use crate::GeoPoint;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const HEADING_TOLERANCE_DEGREES: f64 = 30.0;

fn to_point(p: &GeoPoint) -> Point {
    point!(x: p.longitude, y: p.latitude)
}

/// Haversine distance in meters.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METERS).distance(to_point(a), to_point(b))
}

/// Forward azimuth from `a` to `b` in degrees, normalized to `[0, 360)`.
///
/// The result is meaningless when `a == b`, callers must handle that case themselves.
pub fn initial_bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let bearing = HaversineMeasure::new(EARTH_RADIUS_METERS).bearing(to_point(a), to_point(b));
    normalize_degrees(bearing)
}

/// Destination reached after travelling `distance_meters` from `origin` along the great circle
/// starting at `bearing_degrees`.
pub fn project(origin: &GeoPoint, distance_meters: f64, bearing_degrees: f64) -> GeoPoint {
    if distance_meters == 0.0 {
        return *origin;
    }

    let target = HaversineMeasure::new(EARTH_RADIUS_METERS).destination(
        to_point(origin),
        bearing_degrees,
        distance_meters,
    );

    GeoPoint::new(target.y(), normalize_longitude(target.x()))
}

/// Smallest absolute angle between two bearings, in `[0, 180]`.
pub fn bearing_difference(a: f64, b: f64) -> f64 {
    (normalize_degrees(a - b + 180.0) - 180.0).abs()
}

pub fn is_heading_toward(course: f64, from: &GeoPoint, to: &GeoPoint) -> bool {
    is_heading_toward_within(course, from, to, HEADING_TOLERANCE_DEGREES)
}

pub fn is_heading_toward_within(
    course: f64,
    from: &GeoPoint,
    to: &GeoPoint,
    tolerance_degrees: f64,
) -> bool {
    bearing_difference(course, initial_bearing(from, to)) < tolerance_degrees
}

/// Maps any angle onto `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // `rem_euclid` returns 360.0 for tiny negative inputs.
    if normalized >= 360.0 { 0.0 } else { normalized }
}

fn normalize_longitude(degrees: f64) -> f64 {
    if (-180.0..=180.0).contains(&degrees) {
        degrees
    } else {
        normalize_degrees(degrees + 180.0) - 180.0
    }
}
