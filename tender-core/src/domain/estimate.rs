use chrono::{DateTime, Duration, Utc};

use super::WaypointKind;

/// Where a vessel is heading, derived from its latest fix and the session waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationEstimate {
    /// `None` when the course matches neither waypoint.
    pub target: Option<WaypointKind>,
    /// Distance to `target`, present iff `target` is.
    pub distance_meters: Option<f64>,
    /// Only present while moving towards a classified target.
    pub eta_seconds: Option<f64>,
    /// Set when the vessel is within the mooring radius of a waypoint, overriding the
    /// distance and eta display.
    pub arrived_at: Option<WaypointKind>,
    pub distance_to_ship: f64,
    pub distance_to_pier: f64,
}

impl DestinationEstimate {
    /// Wall clock arrival time, counted from when the fix was received.
    pub fn eta_at(&self, received_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        arrival_time(received_at, self.eta_seconds?)
    }
}

pub fn arrival_time(received_at: DateTime<Utc>, eta_seconds: f64) -> Option<DateTime<Utc>> {
    if !eta_seconds.is_finite() || eta_seconds < 0.0 {
        return None;
    }
    Duration::try_milliseconds((eta_seconds * 1000.0).round() as i64)
        .and_then(|d| received_at.checked_add_signed(d))
}
