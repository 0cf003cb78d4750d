use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::GeoPoint;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, AsRefStr, Display, EnumString,
)]
pub enum WaypointKind {
    Ship,
    Pier,
}

/// A named fixed destination a tender shuttles between.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Waypoint {
    pub kind: WaypointKind,
    pub name: String,
    pub position: GeoPoint,
}

impl Waypoint {
    pub fn ship(name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            kind: WaypointKind::Ship,
            name: name.into(),
            position,
        }
    }

    pub fn pier(position: GeoPoint) -> Self {
        Self {
            kind: WaypointKind::Pier,
            name: WaypointKind::Pier.to_string(),
            position,
        }
    }
}

/// The two destinations known for the current session, each set once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waypoints {
    pub ship: Option<Waypoint>,
    pub pier: Option<Waypoint>,
}

impl Waypoints {
    pub fn both(&self) -> Option<(&Waypoint, &Waypoint)> {
        self.ship.as_ref().zip(self.pier.as_ref())
    }

    pub fn get(&self, kind: WaypointKind) -> Option<&Waypoint> {
        match kind {
            WaypointKind::Ship => self.ship.as_ref(),
            WaypointKind::Pier => self.pier.as_ref(),
        }
    }
}
