use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{CoreResult, GeoPoint, VesselFix, VesselId};

pub type FixStream = BoxStream<'static, VesselFix>;

/// A source of position reports, regardless of whether the backend pushes or is polled.
pub trait FixFeed: Send + Sync {
    /// Fixes for `vessel` in arrival order, ending when the feed shuts down.
    fn subscribe(&self, vessel: &VesselId) -> CoreResult<FixStream>;
}

#[async_trait]
pub trait WaypointSource: Send + Sync {
    /// The pier location, fetched once per session.
    async fn pier(&self) -> CoreResult<Option<GeoPoint>>;
}
