use super::fragments::FragmentMapping;
use super::geometry::{GeometryParameter, GeometryRecord};
use super::structure::StructuralStatistics;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Label stored in the metadata of every analysis produced by this crate.
pub const ANALYSIS_TYPE: &str = "donor_acceptor_geometry";

/// Summary statistics of one parameter over the successful frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterStatistics {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// A frame whose value of one parameter lies far from the trajectory mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFrame {
    pub frame_index: usize,
    pub time_fs: f64,
    pub parameter: GeometryParameter,
    pub value: f64,
    /// Distance from the mean in standard deviations.
    pub deviation_sigma: f64,
    pub description: String,
}

impl KeyFrame {
    pub fn new(
        frame_index: usize,
        time_fs: f64,
        parameter: GeometryParameter,
        value: f64,
        deviation_sigma: f64,
    ) -> Self {
        Self {
            frame_index,
            time_fs,
            parameter,
            value,
            deviation_sigma,
            description: format!("{} = {:.2} ({:.1}σ)", parameter, value, deviation_sigma),
        }
    }
}

impl Eq for KeyFrame {}

// Largest deviation first; ties keep frame order.
impl PartialOrd for KeyFrame {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyFrame {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deviation_sigma
            .total_cmp(&self.deviation_sigma)
            .then_with(|| self.frame_index.cmp(&other.frame_index))
            .then_with(|| self.parameter.cmp(&other.parameter))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub analysis_type: &'static str,
    pub twist_method: String,
    pub total_frames: usize,
    pub successful_frames: usize,
    pub failed_frames: usize,
    pub parameter_statistics: BTreeMap<GeometryParameter, ParameterStatistics>,
    pub key_frames: Vec<KeyFrame>,
    /// Coordinate-level statistics; absent when the first frame is unusable as a reference.
    pub structure: Option<StructuralStatistics>,
}

/// Everything produced by one pass over a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryAnalysis {
    /// One record per input frame, in frame order, failed frames included.
    pub geometry_data: Vec<GeometryRecord>,
    pub fragment_mapping: FragmentMapping,
    pub metadata: AnalysisMetadata,
}

impl TrajectoryAnalysis {
    pub fn failed_records(&self) -> impl Iterator<Item = &GeometryRecord> {
        self.geometry_data.iter().filter(|r| r.analysis_failed)
    }

    pub fn statistics(&self, parameter: GeometryParameter) -> Option<&ParameterStatistics> {
        self.metadata.parameter_statistics.get(&parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_frame_description_is_formatted() {
        let key = KeyFrame::new(3, 1.5, GeometryParameter::TwistAngle, 42.1234, 2.345);
        assert_eq!(key.description, "twist_angle = 42.12 (2.3σ)");
    }

    #[test]
    fn key_frames_sort_by_descending_deviation() {
        let mut frames = vec![
            KeyFrame::new(0, 0.0, GeometryParameter::TwistAngle, 1.0, 2.1),
            KeyFrame::new(1, 0.5, GeometryParameter::RingPlanarity, 1.0, 3.4),
            KeyFrame::new(2, 1.0, GeometryParameter::TwistAngle, 1.0, 2.7),
        ];
        frames.sort();
        let order: Vec<usize> = frames.iter().map(|k| k.frame_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
