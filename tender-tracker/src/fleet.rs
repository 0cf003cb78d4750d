use std::sync::Arc;

use tender_core::{CoreResult, FixFeed, MarkerOutbound, Waypoints};
use tokio::{sync::watch, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    marker::{MarkerSettings, MarkerTask, VesselRole},
    settings::Settings,
};

/// The markers of the ship and its tenders, sharing one set of session waypoints.
pub struct Fleet {
    markers: Vec<MarkerTask>,
    waypoints: Arc<watch::Sender<Waypoints>>,
}

impl Fleet {
    pub fn new(
        settings: &Settings,
        waypoints: Arc<watch::Sender<Waypoints>>,
        outbound: Arc<dyn MarkerOutbound>,
    ) -> Fleet {
        let marker_settings = MarkerSettings {
            tick_interval: settings.tick_interval(),
            stale_after: settings.stale_after,
            timezone: settings.timezone,
        };

        let markers = settings
            .vessels()
            .enumerate()
            .map(|(i, v)| {
                let role = if i == 0 {
                    VesselRole::Ship
                } else {
                    VesselRole::Tender
                };
                MarkerTask::new(
                    v.id.clone(),
                    v.name.clone(),
                    role,
                    &marker_settings,
                    waypoints.subscribe(),
                    outbound.clone(),
                )
            })
            .collect();

        Fleet { markers, waypoints }
    }

    pub fn waypoints(&self) -> watch::Receiver<Waypoints> {
        self.waypoints.subscribe()
    }

    /// Subscribes every marker to `feed` and runs them until `cancel` fires.
    pub fn spawn(self, feed: &dyn FixFeed, cancel: &CancellationToken) -> CoreResult<JoinSet<()>> {
        let mut set = JoinSet::new();
        for marker in self.markers {
            let fixes = feed.subscribe(marker.vessel())?;
            set.spawn(marker.run(fixes, cancel.clone()));
        }
        info!(num_markers = set.len(), "fleet started");
        Ok(set)
    }
}
