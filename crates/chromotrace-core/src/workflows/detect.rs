use crate::core::models::fragments::FragmentMapping;
use crate::core::models::frame::TrajectoryFrame;
use crate::core::topology::connectivity::ConnectivityGraph;
use crate::core::topology::detector::detect_fragments;
use crate::core::topology::registry::BondThresholds;
use crate::engine::error::EngineError;
use tracing::{info, instrument};

/// Detects the fragment mapping of a reference frame.
#[instrument(skip_all, name = "detection_workflow")]
pub fn run(
    frame: &TrajectoryFrame,
    thresholds: &BondThresholds,
) -> Result<FragmentMapping, EngineError> {
    let graph = ConnectivityGraph::build(frame, thresholds)?;
    let mapping = detect_fragments(&frame.symbols, &graph)?;
    info!(
        donor = mapping.donor_nitrogen,
        acceptor = mapping.acceptor_nitrogen,
        "Fragment mapping detected."
    );
    Ok(mapping)
}
