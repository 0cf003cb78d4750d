//! Turns extrapolated state and destination estimates into what a map marker shows.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    DestinationEstimate, ExtrapolatedState, GeoPoint, VesselFix, WaypointKind, Waypoints,
    arrival_time,
};

/// Marker icons are drawn pointing east.
pub const ICON_ROTATION_OFFSET_DEGREES: f64 = -90.0;

const CLOCK_FORMAT: &str = "%H:%M";

/// Placement of a marker for a single render tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFrame {
    pub position: GeoPoint,
    /// Course over ground of the base fix, 0 when unknown.
    pub heading: f64,
    pub rotation: f64,
    pub stale: bool,
}

impl From<&ExtrapolatedState> for MarkerFrame {
    fn from(state: &ExtrapolatedState) -> Self {
        let heading = state.base_fix.course_over_ground.unwrap_or(0.0);
        MarkerFrame {
            position: state.displayed_position,
            heading,
            rotation: heading + ICON_ROTATION_OFFSET_DEGREES,
            stale: state.stale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationLine {
    Arrived {
        kind: WaypointKind,
        name: String,
    },
    EnRoute {
        target: String,
        distance_meters: i64,
        eta: Option<String>,
    },
}

/// Popup text of a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLabel {
    pub name: String,
    pub last_received: Option<String>,
    pub destination: Option<DestinationLine>,
}

impl MarkerLabel {
    pub fn new(
        name: impl Into<String>,
        fix: Option<&VesselFix>,
        estimate: Option<&DestinationEstimate>,
        waypoints: &Waypoints,
        timezone: Tz,
    ) -> Self {
        let last_received = fix.map(|f| format_clock(f.received_at, timezone));

        let destination = fix.zip(estimate).and_then(|(fix, estimate)| {
            let name_of = |kind: WaypointKind| {
                waypoints
                    .get(kind)
                    .map(|w| w.name.clone())
                    .unwrap_or_else(|| kind.to_string())
            };

            if let Some(kind) = estimate.arrived_at {
                return Some(DestinationLine::Arrived {
                    kind,
                    name: name_of(kind),
                });
            }

            let target = estimate.target?;
            let distance = estimate.distance_meters?;
            let eta = estimate
                .eta_seconds
                .filter(|eta| *eta > 0.0)
                .map(|eta| format_clock_time(fix.received_at, eta, timezone));

            Some(DestinationLine::EnRoute {
                target: name_of(target),
                distance_meters: distance.round() as i64,
                eta,
            })
        });

        MarkerLabel {
            name: name.into(),
            last_received,
            destination,
        }
    }
}

impl std::fmt::Display for MarkerLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if let Some(last_received) = &self.last_received {
            write!(f, "\nLast Received: {last_received}")?;
        }
        match &self.destination {
            Some(DestinationLine::Arrived { kind, name }) => match kind {
                WaypointKind::Ship => write!(f, "\nArrived to {name}"),
                WaypointKind::Pier => write!(f, "\nArrived to the {name}"),
            },
            Some(DestinationLine::EnRoute {
                target,
                distance_meters,
                eta,
            }) => {
                write!(f, "\nDistance to {target}: {distance_meters} m")?;
                if let Some(eta) = eta {
                    write!(f, "\nETA to {target}: {eta}")?;
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// What the presentation layer receives for a tracked vessel on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub frame: MarkerFrame,
    pub label: MarkerLabel,
}

/// Local 24-hour clock time of `received_at + eta_seconds`, `--` if no such time exists.
pub fn format_clock_time(received_at: DateTime<Utc>, eta_seconds: f64, timezone: Tz) -> String {
    match arrival_time(received_at, eta_seconds) {
        Some(at) => format_clock(at, timezone),
        None => "--".to_string(),
    }
}

pub fn format_clock(at: DateTime<Utc>, timezone: Tz) -> String {
    at.with_timezone(&timezone).format(CLOCK_FORMAT).to_string()
}
