mod estimate;
mod geo_point;
mod vessel;
mod waypoint;

pub use estimate::*;
pub use geo_point::*;
pub use vessel::*;
pub use waypoint::*;
