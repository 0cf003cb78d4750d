//! Classifies which waypoint a tender is heading for and estimates its arrival.

use crate::{
    DestinationEstimate, GeoPoint, KNOTS_TO_METERS_PER_SECOND, VesselFix, WaypointKind, Waypoints,
    geodesy,
};

/// Below this speed the vessel is considered stopped and no course based classification is done.
pub const MOVING_SPEED_KNOTS: f64 = 0.5;
pub const SHIP_ARRIVAL_RADIUS_METERS: f64 = 60.0;
pub const PIER_ARRIVAL_RADIUS_METERS: f64 = 100.0;

pub fn estimate_destination(fix: &VesselFix, ship: &GeoPoint, pier: &GeoPoint) -> DestinationEstimate {
    let distance_to_ship = geodesy::distance(&fix.position, ship);
    let distance_to_pier = geodesy::distance(&fix.position, pier);

    let (target, distance_meters, eta_seconds) = match fix.motion_above(MOVING_SPEED_KNOTS) {
        Some((speed, course)) => {
            let target = if heading_to(course, &fix.position, ship, distance_to_ship) {
                Some((WaypointKind::Ship, distance_to_ship))
            } else if heading_to(course, &fix.position, pier, distance_to_pier) {
                Some((WaypointKind::Pier, distance_to_pier))
            } else {
                None
            };

            match target {
                Some((kind, distance)) => (
                    Some(kind),
                    Some(distance),
                    Some(distance / (speed * KNOTS_TO_METERS_PER_SECOND)),
                ),
                None => (None, None, None),
            }
        }
        None => {
            if distance_to_ship < distance_to_pier {
                (Some(WaypointKind::Ship), Some(distance_to_ship), None)
            } else {
                (Some(WaypointKind::Pier), Some(distance_to_pier), None)
            }
        }
    };

    let arrived_at = if distance_to_ship < SHIP_ARRIVAL_RADIUS_METERS {
        Some(WaypointKind::Ship)
    } else if distance_to_pier < PIER_ARRIVAL_RADIUS_METERS {
        Some(WaypointKind::Pier)
    } else {
        None
    };

    DestinationEstimate {
        target,
        distance_meters,
        eta_seconds,
        arrived_at,
        distance_to_ship,
        distance_to_pier,
    }
}

/// [`estimate_destination`] against the session waypoints, `None` until both are known.
pub fn estimate_for(fix: &VesselFix, waypoints: &Waypoints) -> Option<DestinationEstimate> {
    let (ship, pier) = waypoints.both()?;
    Some(estimate_destination(fix, &ship.position, &pier.position))
}

// The bearing to a waypoint we are sitting on is undefined, count it as a match and leave it to
// the arrival radius.
fn heading_to(course: f64, from: &GeoPoint, to: &GeoPoint, distance: f64) -> bool {
    distance == 0.0 || geodesy::is_heading_toward(course, from, to)
}
