use super::frame::FS_PER_PS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the geometric order parameters measured on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryParameter {
    /// Donor substituent axis vs. ring plane, degrees in [0, 90].
    TwistAngle,
    /// Largest distance of a ring atom from the best-fit ring plane, Angstroms.
    RingPlanarity,
    /// Acceptor C→N bond vs. ring plane, degrees in [0, 90].
    RingAcceptorAngle,
    /// Donor nitrogen to acceptor carbon, Angstroms.
    DonorAcceptorDistance,
    /// Out-of-plane displacement of the donor nitrogen, degrees in [0, 90].
    DonorPyramidalization,
}

impl GeometryParameter {
    pub const ALL: [GeometryParameter; 5] = [
        GeometryParameter::TwistAngle,
        GeometryParameter::RingPlanarity,
        GeometryParameter::RingAcceptorAngle,
        GeometryParameter::DonorAcceptorDistance,
        GeometryParameter::DonorPyramidalization,
    ];

    /// The parameters screened for key frames unless configured otherwise.
    pub const DEFAULT_OUTLIER_SET: [GeometryParameter; 3] = [
        GeometryParameter::TwistAngle,
        GeometryParameter::RingPlanarity,
        GeometryParameter::RingAcceptorAngle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GeometryParameter::TwistAngle => "twist_angle",
            GeometryParameter::RingPlanarity => "ring_planarity",
            GeometryParameter::RingAcceptorAngle => "ring_acceptor_angle",
            GeometryParameter::DonorAcceptorDistance => "donor_acceptor_distance",
            GeometryParameter::DonorPyramidalization => "donor_pyramidalization",
        }
    }
}

impl fmt::Display for GeometryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryParameter {
    type Err = String;

    /// Accepts the snake_case name, its kebab-case spelling, or a short alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "twist_angle" | "twist" => Ok(GeometryParameter::TwistAngle),
            "ring_planarity" | "planarity" => Ok(GeometryParameter::RingPlanarity),
            "ring_acceptor_angle" | "ring_nitrile_angle" => {
                Ok(GeometryParameter::RingAcceptorAngle)
            }
            "donor_acceptor_distance" | "distance" => Ok(GeometryParameter::DonorAcceptorDistance),
            "donor_pyramidalization" | "amino_pyramidalization" | "pyramidalization" => {
                Ok(GeometryParameter::DonorPyramidalization)
            }
            _ => Err(format!("Unknown geometry parameter '{}'", s)),
        }
    }
}

/// The five order parameters of one successfully analyzed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryParameters {
    pub twist_angle: f64,
    pub ring_planarity: f64,
    pub ring_acceptor_angle: f64,
    pub donor_acceptor_distance: f64,
    pub donor_pyramidalization: f64,
}

impl GeometryParameters {
    pub fn get(&self, parameter: GeometryParameter) -> f64 {
        match parameter {
            GeometryParameter::TwistAngle => self.twist_angle,
            GeometryParameter::RingPlanarity => self.ring_planarity,
            GeometryParameter::RingAcceptorAngle => self.ring_acceptor_angle,
            GeometryParameter::DonorAcceptorDistance => self.donor_acceptor_distance,
            GeometryParameter::DonorPyramidalization => self.donor_pyramidalization,
        }
    }

    fn undefined() -> Self {
        Self {
            twist_angle: f64::NAN,
            ring_planarity: f64::NAN,
            ring_acceptor_angle: f64::NAN,
            donor_acceptor_distance: f64::NAN,
            donor_pyramidalization: f64::NAN,
        }
    }
}

/// Per-frame output of the analysis.
///
/// A failed frame keeps its index and time so the record sequence stays aligned with the
/// input; its parameters are NaN and `failure_reason` says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryRecord {
    pub frame_index: usize,
    pub time_fs: f64,
    pub time_ps: f64,
    #[serde(flatten)]
    pub parameters: GeometryParameters,
    pub analysis_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl GeometryRecord {
    pub fn success(frame_index: usize, time_fs: f64, parameters: GeometryParameters) -> Self {
        Self {
            frame_index,
            time_fs,
            time_ps: time_fs / FS_PER_PS,
            parameters,
            analysis_failed: false,
            failure_reason: None,
        }
    }

    pub fn failure(frame_index: usize, time_fs: f64, reason: impl Into<String>) -> Self {
        Self {
            frame_index,
            time_fs,
            time_ps: time_fs / FS_PER_PS,
            parameters: GeometryParameters::undefined(),
            analysis_failed: true,
            failure_reason: Some(reason.into()),
        }
    }

    /// The value of `parameter`, or `None` for a failed frame.
    pub fn value(&self, parameter: GeometryParameter) -> Option<f64> {
        if self.analysis_failed {
            None
        } else {
            Some(self.parameters.get(parameter)).filter(|v| !v.is_nan())
        }
    }
}
