//! Position estimation between sparse fixes.
//!
//! A tracked vessel starts out without a fix and nothing should be displayed for it. Once the
//! first fix arrives the displayed position is projected forward from the latest fix along
//! its course, at its speed, for as long as the caller keeps ticking.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

use crate::{GeoPoint, KNOTS_TO_METERS_PER_SECOND, VesselFix, geodesy};

/// Fixes at or below this speed are considered noise around a stationary vessel.
pub const STATIONARY_SPEED_KNOTS: f64 = 0.9;
/// A new fix closer than this to the displayed position does not move the marker.
pub const SNAP_THRESHOLD_METERS: f64 = 1.0;

/// Dead reckoned position of `fix` at `now`, `None` if the fix describes a stationary vessel.
pub fn extrapolate(fix: &VesselFix, now: DateTime<Utc>) -> Option<GeoPoint> {
    let (speed, course) = fix.motion_above(STATIONARY_SPEED_KNOTS)?;
    let elapsed = elapsed_seconds(fix.received_at, now);
    Some(geodesy::project(
        &fix.position,
        speed * KNOTS_TO_METERS_PER_SECOND * elapsed,
        course,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtrapolatedState {
    pub displayed_position: GeoPoint,
    pub base_fix: VesselFix,
    /// The base fix is older than the staleness cutoff and the position is frozen.
    pub stale: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// First fix for the vessel.
    Started,
    /// The displayed position jumped to the new fix.
    Snapped,
    /// The new fix replaced the base but the displayed position was kept.
    Continued,
}

#[derive(Debug, Clone, Default)]
pub struct Extrapolator {
    state: Option<ExtrapolatedState>,
    stale_after: Option<TimeDelta>,
}

impl Extrapolator {
    /// `stale_after` bounds how far past its fix a vessel is extrapolated, `None` extrapolates
    /// forever.
    pub fn new(stale_after: Option<std::time::Duration>) -> Self {
        let stale_after = stale_after.and_then(|d| match TimeDelta::from_std(d) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("staleness cutoff out of range, extrapolating without it: {e:?}");
                None
            }
        });

        Self {
            state: None,
            stale_after,
        }
    }

    pub fn state(&self) -> Option<&ExtrapolatedState> {
        self.state.as_ref()
    }

    pub fn base_fix(&self) -> Option<&VesselFix> {
        self.state.as_ref().map(|s| &s.base_fix)
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }

    pub fn apply_fix(&mut self, fix: VesselFix) -> FixOutcome {
        match &mut self.state {
            None => {
                self.state = Some(ExtrapolatedState {
                    displayed_position: fix.position,
                    base_fix: fix,
                    stale: false,
                });
                FixOutcome::Started
            }
            Some(state) => {
                let outcome = if geodesy::distance(&state.displayed_position, &fix.position)
                    > SNAP_THRESHOLD_METERS
                {
                    state.displayed_position = fix.position;
                    FixOutcome::Snapped
                } else {
                    FixOutcome::Continued
                };
                state.base_fix = fix;
                state.stale = false;
                outcome
            }
        }
    }

    /// Advances the displayed position to `now`. Calling this repeatedly with the same `now`
    /// yields the same state.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<&ExtrapolatedState> {
        let stale_after = self.stale_after;
        let state = self.state.as_mut()?;

        let (at, stale) = match stale_after {
            Some(cutoff) if now - state.base_fix.received_at > cutoff => {
                (state.base_fix.received_at + cutoff, true)
            }
            _ => (now, false),
        };

        if let Some(position) = extrapolate(&state.base_fix, at) {
            state.displayed_position = position;
        }
        state.stale = stale;

        Some(&*state)
    }
}

/// Seconds from `from` to `to`, never negative so a fix timestamped ahead of the local clock
/// holds still until the clock catches up.
fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    let seconds = match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    };
    seconds.max(0.0)
}
