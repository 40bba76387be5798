use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Bond cutoff used for element pairs without an explicit entry, in Angstroms.
pub const DEFAULT_CUTOFF: f64 = 1.8;
/// Bond cutoff used for unlisted pairs involving hydrogen, in Angstroms.
pub const HYDROGEN_CUTOFF: f64 = 1.2;

// Keys are element pairs sorted alphabetically and joined with '-'.
#[rustfmt::skip]
static DEFAULT_PAIR_CUTOFFS: Map<&'static str, f64> = phf_map! {
    "C-C" => 1.6,
    "C-N" => 1.5,
    "C-H" => 1.2,
    "H-N" => 1.1,
};

/// Distance thresholds below which two atoms are considered bonded.
///
/// Lookup order: an explicit entry for the (sorted) element pair, then the hydrogen cutoff
/// if either element is hydrogen, then the default cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct BondThresholds {
    pairs: HashMap<(String, String), f64>,
    default_cutoff: f64,
    hydrogen_cutoff: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondThresholdsFile {
    default: Option<f64>,
    hydrogen: Option<f64>,
    #[serde(default, rename = "replace-defaults")]
    replace_defaults: bool,
    #[serde(default)]
    pairs: HashMap<String, f64>,
}

#[derive(Debug, Error)]
pub enum TopologyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid element pair '{0}'. Expected two symbols joined by '-' (e.g., 'C-N')")]
    InvalidPair(String),
    #[error("Invalid cutoff {value} for '{key}'. Cutoffs must be positive and finite")]
    InvalidCutoff { key: String, value: f64 },
}

impl Default for BondThresholds {
    fn default() -> Self {
        let pairs = DEFAULT_PAIR_CUTOFFS
            .entries()
            .filter_map(|(key, &cutoff)| split_pair(key).map(|pair| (pair, cutoff)))
            .collect();
        Self {
            pairs,
            default_cutoff: DEFAULT_CUTOFF,
            hydrogen_cutoff: HYDROGEN_CUTOFF,
        }
    }
}

impl BondThresholds {
    /// Thresholds with no explicit pairs, only the default and hydrogen cutoffs.
    pub fn uniform(default_cutoff: f64, hydrogen_cutoff: f64) -> Self {
        Self {
            pairs: HashMap::new(),
            default_cutoff,
            hydrogen_cutoff,
        }
    }

    /// Loads thresholds from a TOML file.
    ///
    /// ```toml
    /// default = 1.8
    /// hydrogen = 1.2
    /// replace-defaults = false
    ///
    /// [pairs]
    /// "C-O" = 1.5
    /// ```
    ///
    /// Listed pairs extend the built-in table unless `replace-defaults` is set.
    pub fn load(path: &Path) -> Result<Self, TopologyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TopologyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TopologyLoadError::Toml { source, .. } => TopologyLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TopologyLoadError> {
        let file: BondThresholdsFile =
            toml::from_str(content).map_err(|e| TopologyLoadError::Toml {
                path: "<string>".to_string(),
                source: e,
            })?;

        let mut thresholds = if file.replace_defaults {
            Self::uniform(DEFAULT_CUTOFF, HYDROGEN_CUTOFF)
        } else {
            Self::default()
        };
        if let Some(value) = file.default {
            thresholds = thresholds.with_default_cutoff(value)?;
        }
        if let Some(value) = file.hydrogen {
            thresholds = thresholds.with_hydrogen_cutoff(value)?;
        }
        for (key, value) in file.pairs {
            thresholds = thresholds.with_pair_key(&key, value)?;
        }
        Ok(thresholds)
    }

    pub fn with_default_cutoff(mut self, cutoff: f64) -> Result<Self, TopologyLoadError> {
        self.default_cutoff = checked_cutoff("default", cutoff)?;
        Ok(self)
    }

    pub fn with_hydrogen_cutoff(mut self, cutoff: f64) -> Result<Self, TopologyLoadError> {
        self.hydrogen_cutoff = checked_cutoff("hydrogen", cutoff)?;
        Ok(self)
    }

    /// Sets the cutoff for a pair written as `"A-B"`.
    pub fn with_pair_key(mut self, key: &str, cutoff: f64) -> Result<Self, TopologyLoadError> {
        let cutoff = checked_cutoff(key, cutoff)?;
        let pair = split_pair(key).ok_or_else(|| TopologyLoadError::InvalidPair(key.to_string()))?;
        self.pairs.insert(pair, cutoff);
        Ok(self)
    }

    /// Adds or replaces the cutoff for one element pair (order-insensitive).
    pub fn with_pair(mut self, a: &str, b: &str, cutoff: f64) -> Self {
        self.pairs.insert(sorted_pair(a, b), cutoff);
        self
    }

    pub fn default_cutoff(&self) -> f64 {
        self.default_cutoff
    }

    pub fn hydrogen_cutoff(&self) -> f64 {
        self.hydrogen_cutoff
    }

    pub fn cutoff(&self, a: &str, b: &str) -> f64 {
        if let Some(&cutoff) = self.pairs.get(&sorted_pair(a, b)) {
            return cutoff;
        }
        if a == "H" || b == "H" {
            self.hydrogen_cutoff
        } else {
            self.default_cutoff
        }
    }

    /// `true` if two atoms at `distance` count as bonded. The comparison is strict.
    pub fn is_bonded(&self, a: &str, b: &str, distance: f64) -> bool {
        distance < self.cutoff(a, b)
    }
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn split_pair(key: &str) -> Option<(String, String)> {
    let (a, b) = key.split_once('-')?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some(sorted_pair(a, b))
}

fn checked_cutoff(key: &str, value: f64) -> Result<f64, TopologyLoadError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TopologyLoadError::InvalidCutoff {
            key: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_table_covers_common_pairs() {
        let t = BondThresholds::default();
        assert_eq!(t.cutoff("C", "C"), 1.6);
        assert_eq!(t.cutoff("N", "C"), 1.5);
        assert_eq!(t.cutoff("H", "C"), 1.2);
        assert_eq!(t.cutoff("N", "H"), 1.1);
    }

    #[test]
    fn unlisted_pairs_fall_back_to_default_or_hydrogen_cutoff() {
        let t = BondThresholds::default();
        assert_eq!(t.cutoff("C", "O"), DEFAULT_CUTOFF);
        assert_eq!(t.cutoff("O", "H"), HYDROGEN_CUTOFF);
        assert_eq!(t.cutoff("H", "H"), HYDROGEN_CUTOFF);
    }

    #[test]
    fn bonding_comparison_is_strict() {
        let t = BondThresholds::default();
        assert!(t.is_bonded("C", "C", 1.59));
        assert!(!t.is_bonded("C", "C", 1.6));
    }

    #[test]
    fn with_pair_is_order_insensitive() {
        let t = BondThresholds::default().with_pair("O", "C", 1.45);
        assert_eq!(t.cutoff("C", "O"), 1.45);
        assert_eq!(t.cutoff("O", "C"), 1.45);
    }

    #[test]
    fn toml_extends_defaults() {
        let t = BondThresholds::from_toml_str(
            r#"
            default = 2.0
            [pairs]
            "O-C" = 1.45
            "#,
        )
        .unwrap();
        assert_eq!(t.cutoff("C", "O"), 1.45);
        assert_eq!(t.cutoff("C", "C"), 1.6);
        assert_eq!(t.cutoff("C", "S"), 2.0);
    }

    #[test]
    fn toml_can_replace_defaults() {
        let t = BondThresholds::from_toml_str("replace-defaults = true\n").unwrap();
        assert_eq!(t.cutoff("C", "C"), DEFAULT_CUTOFF);
        assert_eq!(t.cutoff("N", "H"), HYDROGEN_CUTOFF);
    }

    #[test]
    fn invalid_pair_key_is_rejected() {
        let result = BondThresholds::from_toml_str("[pairs]\nCC = 1.5\n");
        assert!(matches!(result, Err(TopologyLoadError::InvalidPair(key)) if key == "CC"));
    }

    #[test]
    fn non_positive_cutoff_is_rejected() {
        let result = BondThresholds::from_toml_str("hydrogen = -1.0\n");
        assert!(matches!(
            result,
            Err(TopologyLoadError::InvalidCutoff { .. })
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pairs]\n\"C-S\" = 1.9").unwrap();
        let t = BondThresholds::load(file.path()).unwrap();
        assert_eq!(t.cutoff("S", "C"), 1.9);

        let missing = BondThresholds::load(Path::new("/nonexistent/bonds.toml"));
        assert!(matches!(missing, Err(TopologyLoadError::Io { .. })));
    }
}
