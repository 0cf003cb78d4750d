use crate::{MarkerView, VesselId};

/// The seam to whatever renders markers.
pub trait MarkerOutbound: Send + Sync {
    /// `None` means the vessel has no fix yet or its marker was removed, nothing is drawn.
    fn publish(&self, vessel: &VesselId, view: Option<MarkerView>);
}
