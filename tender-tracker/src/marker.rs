use std::{sync::Arc, time::Duration};

use chrono::Utc;
use chrono_tz::Tz;
use futures::StreamExt;
use tender_core::{
    DestinationEstimate, Extrapolator, FixStream, MarkerFrame, MarkerLabel, MarkerOutbound,
    MarkerView, VesselFix, VesselId, Waypoints, estimate_for,
};
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselRole {
    /// Tracked and labelled, but never given a destination estimate.
    Ship,
    /// Shuttles between the ship and the pier and gets a destination estimate.
    Tender,
}

/// Drives the marker of a single vessel.
///
/// New fixes re-base the extrapolation, every tick publishes the extrapolated position
/// through the outbound port. Nothing is published until the first fix arrives.
pub struct MarkerTask {
    id: VesselId,
    name: String,
    role: VesselRole,
    extrapolator: Extrapolator,
    estimate: Option<DestinationEstimate>,
    label: MarkerLabel,
    tick_interval: Duration,
    timezone: Tz,
    waypoints: watch::Receiver<Waypoints>,
    outbound: Arc<dyn MarkerOutbound>,
}

pub struct MarkerSettings {
    pub tick_interval: Duration,
    pub stale_after: Option<Duration>,
    pub timezone: Tz,
}

impl MarkerTask {
    pub fn new(
        id: VesselId,
        name: String,
        role: VesselRole,
        settings: &MarkerSettings,
        waypoints: watch::Receiver<Waypoints>,
        outbound: Arc<dyn MarkerOutbound>,
    ) -> MarkerTask {
        let label = MarkerLabel::new(
            name.clone(),
            None,
            None,
            &waypoints.borrow(),
            settings.timezone,
        );

        MarkerTask {
            id,
            name,
            role,
            extrapolator: Extrapolator::new(settings.stale_after),
            estimate: None,
            label,
            tick_interval: settings.tick_interval,
            timezone: settings.timezone,
            waypoints,
            outbound,
        }
    }

    pub fn vessel(&self) -> &VesselId {
        &self.id
    }

    #[instrument(skip_all, fields(vessel = %self.id))]
    pub async fn run(mut self, mut fixes: FixStream, cancel: CancellationToken) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut feed_open = true;
        let mut waypoints_open = true;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                fix = fixes.next(), if feed_open => match fix {
                    Some(fix) => self.on_fix(fix),
                    None => {
                        warn!("fix feed closed, continuing from the last known fix");
                        feed_open = false;
                    }
                },
                changed = self.waypoints.changed(), if waypoints_open => match changed {
                    Ok(()) => self.refresh_estimate(),
                    Err(_) => waypoints_open = false,
                },
                _ = ticker.tick() => self.on_tick(),
            }
        }

        self.outbound.publish(&self.id, None);
        debug!("marker removed");
    }

    fn on_fix(&mut self, fix: VesselFix) {
        let position = fix.position;
        let outcome = self.extrapolator.apply_fix(fix);
        debug!(?outcome, %position, "applied fix");
        self.refresh_estimate();
    }

    fn refresh_estimate(&mut self) {
        let waypoints = self.waypoints.borrow_and_update().clone();
        let fix = self.extrapolator.base_fix();

        self.estimate = match self.role {
            VesselRole::Ship => None,
            VesselRole::Tender => fix.and_then(|f| estimate_for(f, &waypoints)),
        };

        let label = MarkerLabel::new(
            self.name.clone(),
            fix,
            self.estimate.as_ref(),
            &waypoints,
            self.timezone,
        );

        if label != self.label {
            info!(label = %label, "marker label updated");
            self.label = label;
        }
    }

    fn on_tick(&mut self) {
        let Some(state) = self.extrapolator.tick(Utc::now()) else {
            return;
        };

        let frame = MarkerFrame::from(state);
        trace!(position = %frame.position, stale = frame.stale, "frame");

        self.outbound.publish(
            &self.id,
            Some(MarkerView {
                frame,
                label: self.label.clone(),
            }),
        );
    }
}
