use std::{collections::HashMap, sync::Arc};

use futures::{StreamExt, future};
use tender_core::{
    CoreResult, FixFeed, FixStream, GeoPoint, MarkerOutbound, MarkerView, VesselFix, VesselId,
    Waypoint, Waypoints, core_error::UnknownVesselSnafu,
};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, trace};

/// Fans fixes out from the feed adapters to one marker per vessel.
///
/// Only the latest fix per vessel is retained, a marker that falls behind skips straight to
/// the newest report. The ship waypoint is therefore taken here, on publish, so it comes
/// from the first ship fix even when a marker never sees that fix.
#[derive(Clone)]
pub struct FixHub {
    senders: Arc<HashMap<VesselId, watch::Sender<Option<VesselFix>>>>,
    ship: Option<Arc<ShipWaypoint>>,
}

struct ShipWaypoint {
    id: VesselId,
    name: String,
    waypoints: Arc<watch::Sender<Waypoints>>,
}

impl FixHub {
    pub fn new(vessels: impl IntoIterator<Item = VesselId>) -> FixHub {
        let senders = vessels
            .into_iter()
            .map(|id| (id, watch::Sender::new(None)))
            .collect();

        FixHub {
            senders: Arc::new(senders),
            ship: None,
        }
    }

    /// Sets the ship waypoint in `waypoints` from the first fix published for `id`.
    pub fn with_ship_waypoint(
        mut self,
        id: VesselId,
        name: String,
        waypoints: Arc<watch::Sender<Waypoints>>,
    ) -> FixHub {
        self.ship = Some(Arc::new(ShipWaypoint {
            id,
            name,
            waypoints,
        }));
        self
    }

    pub fn publish(&self, vessel: &VesselId, fix: VesselFix) -> CoreResult<()> {
        let Some(sender) = self.senders.get(vessel) else {
            return UnknownVesselSnafu { id: vessel.clone() }.fail();
        };
        trace!(%vessel, position = %fix.position, "publishing fix");

        if let Some(ship) = &self.ship {
            if ship.id == *vessel {
                ship.set_once(fix.position);
            }
        }

        sender.send_replace(Some(fix));
        Ok(())
    }

    pub fn latest(&self, vessel: &VesselId) -> Option<VesselFix> {
        self.senders.get(vessel).and_then(|s| s.borrow().clone())
    }
}

impl ShipWaypoint {
    // The ship does not move much while tenders are operating, so its first position is
    // kept for the whole session.
    fn set_once(&self, position: GeoPoint) {
        let set = self.waypoints.send_if_modified(|waypoints| {
            if waypoints.ship.is_some() {
                return false;
            }
            waypoints.ship = Some(Waypoint::ship(self.name.clone(), position));
            true
        });

        if set {
            info!(vessel = %self.id, %position, "ship waypoint set");
        }
    }
}

impl FixFeed for FixHub {
    fn subscribe(&self, vessel: &VesselId) -> CoreResult<FixStream> {
        let Some(sender) = self.senders.get(vessel) else {
            return UnknownVesselSnafu { id: vessel.clone() }.fail();
        };
        Ok(WatchStream::new(sender.subscribe())
            .filter_map(future::ready)
            .boxed())
    }
}

/// Latest marker view of every vessel, what a map renderer would draw.
#[derive(Clone)]
pub struct MarkerBoard {
    views: Arc<HashMap<VesselId, watch::Sender<Option<MarkerView>>>>,
}

impl MarkerBoard {
    pub fn new(vessels: impl IntoIterator<Item = VesselId>) -> MarkerBoard {
        let views = vessels
            .into_iter()
            .map(|id| (id, watch::Sender::new(None)))
            .collect();

        MarkerBoard {
            views: Arc::new(views),
        }
    }

    pub fn view(&self, vessel: &VesselId) -> Option<MarkerView> {
        self.views.get(vessel).and_then(|v| v.borrow().clone())
    }

    pub fn watch(&self, vessel: &VesselId) -> Option<watch::Receiver<Option<MarkerView>>> {
        self.views.get(vessel).map(|v| v.subscribe())
    }
}

impl MarkerOutbound for MarkerBoard {
    fn publish(&self, vessel: &VesselId, view: Option<MarkerView>) {
        if let Some(sender) = self.views.get(vessel) {
            sender.send_replace(view);
        }
    }
}
