use snafu::{Location, Snafu};

use crate::VesselId;

pub type CoreResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module(core_error), visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid fix, reason: '{reason}'"))]
    InvalidFix {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
    #[snafu(display("Invalid coordinate, latitude: '{latitude}', longitude: '{longitude}'"))]
    InvalidCoordinate {
        #[snafu(implicit)]
        location: Location,
        latitude: f64,
        longitude: f64,
    },
    #[snafu(display("Received data for an unknown vessel, id: '{id}'"))]
    UnknownVessel {
        #[snafu(implicit)]
        location: Location,
        id: VesselId,
    },
    #[snafu(display("An unexpected error occured"))]
    Unexpected {
        #[snafu(implicit)]
        location: Location,
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}
