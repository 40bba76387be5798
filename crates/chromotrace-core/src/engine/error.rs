use thiserror::Error;

use super::config::ConfigError;
use super::tasks::frame_geometry::GeometryError;
use crate::core::models::fragments::MappingError;
use crate::core::topology::detector::DetectionError;
use crate::core::topology::registry::TopologyLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Trajectory contains no frames")]
    EmptyTrajectory,

    #[error("Reference frame {index} is out of range for a trajectory of {frame_count} frames")]
    ReferenceFrameOutOfRange { index: usize, frame_count: usize },

    #[error("Fragment detection failed: {source}")]
    Detection {
        #[from]
        source: DetectionError,
    },

    #[error("Invalid fragment mapping: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Failed to load bond thresholds: {source}")]
    Thresholds {
        #[from]
        source: TopologyLoadError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Frame geometry could not be computed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },
}
