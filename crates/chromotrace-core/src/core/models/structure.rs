use serde::Serialize;

/// Per-axis extent of a set of points, `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// How the mass-weighted center of the molecule moved over the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CenterOfMassSummary {
    pub mean: [f64; 3],
    /// Population standard deviation per axis.
    pub std: [f64; 3],
    pub range: AxisBounds,
}

/// Deviation of every frame from the first frame after removing translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsdSummary {
    /// One value per input frame in Angstroms; `NaN` for frames left out of the comparison.
    pub values: Vec<f64>,
    pub mean: f64,
    pub max: f64,
    /// Value of the last compared frame.
    #[serde(rename = "final")]
    pub last: f64,
}

/// Atom displacements between consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionSummary {
    /// Number of frame-to-frame steps that entered the averages.
    pub steps: usize,
    /// Mean atom displacement per step, in Angstroms.
    pub mean_displacement_per_step: f64,
    pub max_displacement_per_step: f64,
    /// Mean atom speed in Angstroms per femtosecond; `NaN` when no step has a positive
    /// time difference.
    pub mean_velocity: f64,
}

/// Trajectory-wide structural statistics, independent of the fragment mapping.
///
/// Only frames whose atom list matches the first frame take part; the rest are counted in
/// `skipped_frames`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralStatistics {
    pub atom_count: usize,
    pub molecular_formula: String,
    pub atom_types: Vec<String>,
    pub frames_used: usize,
    pub skipped_frames: usize,
    pub time_range_fs: [f64; 2],
    pub coordinate_bounds: AxisBounds,
    pub center_of_mass: CenterOfMassSummary,
    pub rmsd: RmsdSummary,
    /// Absent when no two consecutive frames were both usable.
    pub motion: Option<MotionSummary>,
}
