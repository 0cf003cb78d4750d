//! Wire formats of the position backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tender_core::{
    CoreResult, GeoPoint, VesselFix, VesselId, core_error::InvalidFixSnafu,
    geodesy::normalize_degrees,
};

/// One line of the push feed, the latest report for `vessel`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FixRecord {
    pub vessel: VesselId,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Knots.
    pub speed: Option<f64>,
    #[serde(alias = "heading")]
    pub course: Option<f64>,
    pub timestamp: Option<Timestamp>,
}

/// Milliseconds since the unix epoch or an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Rfc3339(DateTime<Utc>),
}

/// A single reading of the sensor polling backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorReading {
    #[serde(rename = "User ID")]
    pub user_id: Option<u32>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "SOG", default)]
    pub speed_over_ground: Option<f64>,
    #[serde(rename = "COG", default)]
    pub course_over_ground: Option<f64>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PierRecord {
    pub lat: f64,
    pub lng: f64,
}

impl Timestamp {
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.round() as i64)
            }
            Timestamp::Millis(_) => None,
            Timestamp::Rfc3339(t) => Some(t),
        }
    }
}

impl FixRecord {
    /// Converts the record into a fix, stamping it with `now` if it carries no usable
    /// timestamp.
    pub fn into_fix(self, now: DateTime<Utc>) -> CoreResult<(VesselId, VesselFix)> {
        let fix = new_fix(
            self.lat,
            self.lon,
            self.speed,
            self.course,
            self.timestamp,
            now,
        )?;
        Ok((self.vessel, fix))
    }
}

impl SensorReading {
    /// Whether the reading carries a position, the backend reports 0/0 when it has none.
    pub fn has_position(&self) -> bool {
        matches!(
            (self.latitude, self.longitude),
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0
        )
    }

    pub fn to_fix(&self, now: DateTime<Utc>) -> CoreResult<VesselFix> {
        new_fix(
            self.latitude,
            self.longitude,
            self.speed_over_ground,
            self.course_over_ground,
            self.timestamp,
            now,
        )
    }
}

// The backends report an unknown position as 0/0 or leave it out.
fn new_fix(
    latitude: Option<f64>,
    longitude: Option<f64>,
    speed: Option<f64>,
    course: Option<f64>,
    timestamp: Option<Timestamp>,
    now: DateTime<Utc>,
) -> CoreResult<VesselFix> {
    let (Some(latitude), Some(longitude)) = (
        latitude.filter(|v| *v != 0.0),
        longitude.filter(|v| *v != 0.0),
    ) else {
        return InvalidFixSnafu {
            reason: "missing latitude or longitude",
        }
        .fail();
    };

    Ok(VesselFix {
        position: GeoPoint::try_new(latitude, longitude)?,
        speed_over_ground: speed.filter(|s| s.is_finite() && *s >= 0.0),
        course_over_ground: course.filter(|c| c.is_finite()).map(normalize_degrees),
        received_at: timestamp.and_then(Timestamp::to_utc).unwrap_or(now),
    })
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl FixRecord {
        pub fn from_fix(vessel: &VesselId, fix: &VesselFix) -> FixRecord {
            FixRecord {
                vessel: vessel.clone(),
                lat: Some(fix.position.latitude),
                lon: Some(fix.position.longitude),
                speed: fix.speed_over_ground,
                course: fix.course_over_ground,
                timestamp: Some(Timestamp::Millis(fix.received_at.timestamp_millis() as f64)),
            }
        }
    }
}
