use crate::error::{CliError, Result};
use chromotrace::core::models::fragments::FragmentMapping;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTrajectoryConfig {
    pub timestep_fs: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAnalysisConfig {
    pub twist_method: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutlierConfig {
    pub threshold_sigma: Option<f64>,
    pub max_key_frames: Option<usize>,
    pub parameters: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBondConfig {
    /// Threshold table loaded first; the keys below are applied on top of it.
    pub table: Option<PathBuf>,
    pub default: Option<f64>,
    pub hydrogen: Option<f64>,
    #[serde(default)]
    pub pairs: BTreeMap<String, f64>,
}

/// The TOML configuration file. Every key is optional.
///
/// `[fragments]` takes the same keys as the mapping written by `chromotrace detect`.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub reference_frame: Option<usize>,
    pub trajectory: Option<FileTrajectoryConfig>,
    pub analysis: Option<FileAnalysisConfig>,
    pub outliers: Option<FileOutlierConfig>,
    pub bonds: Option<FileBondConfig>,
    pub fragments: Option<FragmentMapping>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
