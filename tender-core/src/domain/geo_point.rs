use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::{CoreResult, core_error::InvalidCoordinateSnafu};

/// A position on the earth surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Same as [`GeoPoint::new`] but rejects non-finite and out of range coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> CoreResult<Self> {
        ensure!(
            latitude.is_finite()
                && longitude.is_finite()
                && (-90.0..=90.0).contains(&latitude)
                && (-180.0..=180.0).contains(&longitude),
            InvalidCoordinateSnafu {
                latitude,
                longitude
            }
        );

        Ok(Self::new(latitude, longitude))
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(feature = "test")]
mod test {
    use rand::Rng;

    use super::*;

    impl GeoPoint {
        /// A random point away from the poles, where the spherical formulas stay well conditioned.
        pub fn test_random() -> GeoPoint {
            let mut rng = rand::rng();
            GeoPoint::new(rng.random_range(-70.0..70.0), rng.random_range(-179.0..179.0))
        }
    }
}
