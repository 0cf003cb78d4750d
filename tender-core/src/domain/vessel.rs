use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

pub const KNOTS_TO_METERS_PER_SECOND: f64 = 0.514444;

/// Key a vessel is published under by the position feed, e.g. `tender3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VesselId(String);

impl VesselId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for VesselId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VesselId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single position report for a vessel.
///
/// Speed and course are optional as the feed does not guarantee them, a fix lacking
/// either is treated as a stationary vessel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VesselFix {
    pub position: GeoPoint,
    /// Knots.
    pub speed_over_ground: Option<f64>,
    /// Degrees true, `[0, 360)`.
    pub course_over_ground: Option<f64>,
    pub received_at: DateTime<Utc>,
}

impl VesselFix {
    pub fn speed_meters_per_second(&self) -> Option<f64> {
        self.speed_over_ground
            .map(|knots| knots * KNOTS_TO_METERS_PER_SECOND)
    }

    /// Speed and course, if both are present and the speed is above `threshold_knots`.
    pub fn motion_above(&self, threshold_knots: f64) -> Option<(f64, f64)> {
        match (self.speed_over_ground, self.course_over_ground) {
            (Some(speed), Some(course))
                if speed.is_finite() && course.is_finite() && speed > threshold_knots =>
            {
                Some((speed, course))
            }
            _ => None,
        }
    }
}

#[cfg(feature = "test")]
mod test {
    use rand::Rng;

    use super::*;

    impl VesselFix {
        pub fn test_default() -> VesselFix {
            let mut rng = rand::rng();
            VesselFix {
                position: GeoPoint::test_random(),
                speed_over_ground: Some(rng.random_range(1.0..20.0)),
                course_over_ground: Some(rng.random_range(0.0..360.0)),
                received_at: Utc::now(),
            }
        }

        pub fn test_stationary(position: GeoPoint, received_at: DateTime<Utc>) -> VesselFix {
            VesselFix {
                position,
                speed_over_ground: Some(0.0),
                course_over_ground: Some(0.0),
                received_at,
            }
        }

        pub fn test_moving(
            position: GeoPoint,
            speed_over_ground: f64,
            course_over_ground: f64,
            received_at: DateTime<Utc>,
        ) -> VesselFix {
            VesselFix {
                position,
                speed_over_ground: Some(speed_over_ground),
                course_over_ground: Some(course_over_ground),
                received_at,
            }
        }
    }
}
