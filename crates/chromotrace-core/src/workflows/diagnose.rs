use crate::core::models::fragments::FragmentMapping;
use crate::core::models::frame::TrajectoryFrame;
use crate::engine::config::TwistMethod;
use crate::engine::error::EngineError;
use crate::engine::tasks::frame_geometry::FragmentGeometry;
use nalgebra::Vector3;
use tracing::{debug, instrument};

/// The twist angle of one frame under every formula, plus the vectors they are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TwistDiagnostics {
    pub twist_angles: Vec<(TwistMethod, f64)>,
    pub ring_normal: Vector3<f64>,
    pub substituent_vector: Vector3<f64>,
    pub ring_planarity: f64,
}

impl TwistDiagnostics {
    pub fn angle(&self, method: TwistMethod) -> Option<f64> {
        self.twist_angles
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, angle)| *angle)
    }

    /// Largest disagreement between any two formulas, in degrees.
    pub fn spread(&self) -> f64 {
        let angles = self.twist_angles.iter().map(|(_, a)| *a);
        let max = angles.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = angles.fold(f64::INFINITY, f64::min);
        if max >= min { max - min } else { 0.0 }
    }
}

#[instrument(skip_all, name = "diagnose_workflow")]
pub fn run(
    frame: &TrajectoryFrame,
    mapping: &FragmentMapping,
) -> Result<TwistDiagnostics, EngineError> {
    mapping.validate(&frame.symbols)?;
    let geometry = FragmentGeometry::resolve(mapping, &frame.coords)?;

    let diagnostics = TwistDiagnostics {
        twist_angles: TwistMethod::ALL
            .into_iter()
            .map(|method| (method, geometry.twist_angle(method)))
            .collect(),
        ring_normal: geometry.ring_plane().normal.into_inner(),
        substituent_vector: geometry.substituent_vector(),
        ring_planarity: geometry.ring_planarity(),
    };
    debug!(spread = diagnostics.spread(), "Twist methods compared.");
    Ok(diagnostics)
}
