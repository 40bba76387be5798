use crate::core::models::fragments::FragmentMapping;
use crate::core::models::geometry::GeometryParameter;
use crate::core::topology::registry::BondThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_THRESHOLD_SIGMA: f64 = 2.0;
pub const DEFAULT_MAX_KEY_FRAMES: usize = 20;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Formula used for the donor twist angle. All three report degrees folded into `[0, 90]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwistMethod {
    /// `90 - angle(substituent axis, ring normal)`.
    #[default]
    Default,
    /// Dihedral ring neighbor -> ring donor atom -> donor N -> first substituent.
    Dihedral,
    /// Angle between the ring plane and the plane through ring donor atom, N and a substituent.
    #[serde(rename = "plane")]
    PlaneToPlane,
}

impl TwistMethod {
    pub const ALL: [TwistMethod; 3] = [
        TwistMethod::Default,
        TwistMethod::Dihedral,
        TwistMethod::PlaneToPlane,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            TwistMethod::Default => "default",
            TwistMethod::Dihedral => "dihedral",
            TwistMethod::PlaneToPlane => "plane",
        }
    }
}

impl fmt::Display for TwistMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TwistMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "normal" => Ok(TwistMethod::Default),
            "dihedral" => Ok(TwistMethod::Dihedral),
            "plane" | "plane-to-plane" | "plane_to_plane" => Ok(TwistMethod::PlaneToPlane),
            other => Err(ConfigError::InvalidParameter {
                name: "twist_method",
                reason: format!(
                    "unknown method '{}' (expected default, dihedral or plane)",
                    other
                ),
            }),
        }
    }
}

/// Where the fragment mapping comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentSource {
    AutoDetect { reference_frame: usize },
    Manual(FragmentMapping),
}

impl Default for FragmentSource {
    fn default() -> Self {
        FragmentSource::AutoDetect { reference_frame: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlierConfig {
    /// Minimum |z| for a frame to be reported.
    pub threshold_sigma: f64,
    pub max_key_frames: usize,
    pub parameters: Vec<GeometryParameter>,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            threshold_sigma: DEFAULT_THRESHOLD_SIGMA,
            max_key_frames: DEFAULT_MAX_KEY_FRAMES,
            parameters: GeometryParameter::DEFAULT_OUTLIER_SET.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisConfig {
    pub twist_method: TwistMethod,
    pub fragments: FragmentSource,
    pub bond_thresholds: BondThresholds,
    pub outliers: OutlierConfig,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    twist_method: Option<TwistMethod>,
    fragments: Option<FragmentSource>,
    bond_thresholds: Option<BondThresholds>,
    threshold_sigma: Option<f64>,
    max_key_frames: Option<usize>,
    outlier_parameters: Option<Vec<GeometryParameter>>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn twist_method(mut self, method: TwistMethod) -> Self {
        self.twist_method = Some(method);
        self
    }
    pub fn fragments(mut self, source: FragmentSource) -> Self {
        self.fragments = Some(source);
        self
    }
    pub fn manual_mapping(mut self, mapping: FragmentMapping) -> Self {
        self.fragments = Some(FragmentSource::Manual(mapping));
        self
    }
    pub fn reference_frame(mut self, index: usize) -> Self {
        self.fragments = Some(FragmentSource::AutoDetect {
            reference_frame: index,
        });
        self
    }
    pub fn bond_thresholds(mut self, thresholds: BondThresholds) -> Self {
        self.bond_thresholds = Some(thresholds);
        self
    }
    pub fn threshold_sigma(mut self, sigma: f64) -> Self {
        self.threshold_sigma = Some(sigma);
        self
    }
    pub fn max_key_frames(mut self, n: usize) -> Self {
        self.max_key_frames = Some(n);
        self
    }
    pub fn outlier_parameters(mut self, parameters: Vec<GeometryParameter>) -> Self {
        self.outlier_parameters = Some(parameters);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = OutlierConfig::default();
        let outliers = OutlierConfig {
            threshold_sigma: self.threshold_sigma.unwrap_or(defaults.threshold_sigma),
            max_key_frames: self.max_key_frames.unwrap_or(defaults.max_key_frames),
            parameters: self.outlier_parameters.unwrap_or(defaults.parameters),
        };

        if !outliers.threshold_sigma.is_finite() || outliers.threshold_sigma <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "threshold_sigma",
                reason: format!("must be a positive number, got {}", outliers.threshold_sigma),
            });
        }
        if outliers.max_key_frames == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_key_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if outliers.parameters.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "outlier_parameters",
                reason: "at least one parameter must be screened".to_string(),
            });
        }

        Ok(AnalysisConfig {
            twist_method: self.twist_method.unwrap_or_default(),
            fragments: self.fragments.unwrap_or_default(),
            bond_thresholds: self.bond_thresholds.unwrap_or_default(),
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_documented_values() {
        let config = AnalysisConfigBuilder::new().build().unwrap();
        assert_eq!(config.twist_method, TwistMethod::Default);
        assert_eq!(
            config.fragments,
            FragmentSource::AutoDetect { reference_frame: 0 }
        );
        assert_eq!(config.outliers.threshold_sigma, 2.0);
        assert_eq!(config.outliers.max_key_frames, 20);
        assert_eq!(config.outliers.parameters.len(), 3);
    }

    #[test]
    fn builder_rejects_non_positive_threshold() {
        let err = AnalysisConfigBuilder::new()
            .threshold_sigma(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "threshold_sigma",
                ..
            }
        ));
        assert!(
            AnalysisConfigBuilder::new()
                .threshold_sigma(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn builder_rejects_zero_cap_and_empty_parameter_list() {
        assert!(AnalysisConfigBuilder::new().max_key_frames(0).build().is_err());
        assert!(
            AnalysisConfigBuilder::new()
                .outlier_parameters(Vec::new())
                .build()
                .is_err()
        );
    }

    #[test]
    fn twist_method_tokens_parse_and_display() {
        for method in TwistMethod::ALL {
            assert_eq!(method.token().parse::<TwistMethod>().unwrap(), method);
        }
        assert_eq!("PLANE".parse::<TwistMethod>().unwrap(), TwistMethod::PlaneToPlane);
        assert!("bogus".parse::<TwistMethod>().is_err());
        assert_eq!(TwistMethod::PlaneToPlane.to_string(), "plane");
    }

    #[test]
    fn twist_method_deserializes_from_tokens() {
        #[derive(Deserialize)]
        struct Wrapper {
            method: TwistMethod,
        }
        let parsed: Wrapper = toml::from_str("method = \"plane\"").unwrap();
        assert_eq!(parsed.method, TwistMethod::PlaneToPlane);
        let parsed: Wrapper = toml::from_str("method = \"dihedral\"").unwrap();
        assert_eq!(parsed.method, TwistMethod::Dihedral);
    }
}
