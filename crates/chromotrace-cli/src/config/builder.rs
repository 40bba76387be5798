use super::defaults::DefaultsConfig;
use super::file::{FileBondConfig, FileConfig};
use super::models::AppConfig;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use chromotrace::core::io::traits::ReadOptions;
use chromotrace::core::models::fragments::FragmentMapping;
use chromotrace::core::models::geometry::GeometryParameter;
use chromotrace::core::topology::registry::{BondThresholds, TopologyLoadError};
use chromotrace::engine::config as core_config;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &AnalyzeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let timestep_fs = args
        .timestep_fs
        .or(file_config.trajectory.as_ref().and_then(|t| t.timestep_fs))
        .unwrap_or(defaults.timestep_fs);
    if !timestep_fs.is_finite() || timestep_fs <= 0.0 {
        return Err(CliError::Config(format!(
            "The timestep must be a positive number of femtoseconds, got {}",
            timestep_fs
        )));
    }

    let twist_method = match args.twist_method {
        Some(method) => method,
        None => file_config
            .analysis
            .as_ref()
            .and_then(|a| a.twist_method.as_deref())
            .unwrap_or(defaults.twist_method.as_str())
            .parse()
            .map_err(|e: core_config::ConfigError| CliError::Config(e.to_string()))?,
    };

    let fragments = if let Some(path) = &args.mapping {
        core_config::FragmentSource::Manual(load_mapping(path)?)
    } else if let Some(mapping) = file_config.fragments.clone() {
        core_config::FragmentSource::Manual(mapping)
    } else {
        core_config::FragmentSource::AutoDetect {
            reference_frame: args
                .reference_frame
                .or(file_config.reference_frame)
                .unwrap_or(defaults.reference_frame),
        }
    };

    let bond_thresholds = resolve_bond_thresholds(args.bonds.as_deref(), file_config.bonds)?;

    let outliers_file = file_config.outliers.unwrap_or_default();
    let threshold_sigma = args
        .threshold_sigma
        .or(outliers_file.threshold_sigma)
        .unwrap_or(defaults.threshold_sigma);
    let max_key_frames = args
        .max_key_frames
        .or(outliers_file.max_key_frames)
        .unwrap_or(defaults.max_key_frames);
    let outlier_parameters = outliers_file
        .parameters
        .unwrap_or(defaults.outlier_parameters)
        .iter()
        .map(|name| GeometryParameter::from_str(name).map_err(CliError::Config))
        .collect::<Result<Vec<_>>>()?;

    let core_config = core_config::AnalysisConfigBuilder::new()
        .twist_method(twist_method)
        .fragments(fragments)
        .bond_thresholds(bond_thresholds)
        .threshold_sigma(threshold_sigma)
        .max_key_frames(max_key_frames)
        .outlier_parameters(outlier_parameters)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        json_output: args.output.clone(),
        csv_output: args.csv.clone(),
        read_options: ReadOptions { timestep_fs },
        core_config,
    })
}

/// Reads a fragment mapping written by `chromotrace detect` (or by hand).
pub fn load_mapping(path: &Path) -> Result<FragmentMapping> {
    debug!("Loading fragment mapping from {:?}", path);
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Starts from the table given on the command line (or the file's `table`, or the built-in
/// defaults) and applies the file's cutoff overrides.
pub fn resolve_bond_thresholds(
    cli_table: Option<&Path>,
    file_bonds: Option<FileBondConfig>,
) -> Result<BondThresholds> {
    let file_bonds = file_bonds.unwrap_or_default();
    let table = cli_table.or(file_bonds.table.as_deref());

    let mut thresholds = match table {
        Some(path) => BondThresholds::load(path).map_err(|e| CliError::Engine(e.into()))?,
        None => BondThresholds::default(),
    };

    let invalid =
        |e: TopologyLoadError| CliError::Config(format!("Invalid bond threshold: {}", e));
    if let Some(cutoff) = file_bonds.default {
        thresholds = thresholds.with_default_cutoff(cutoff).map_err(invalid)?;
    }
    if let Some(cutoff) = file_bonds.hydrogen {
        thresholds = thresholds.with_hydrogen_cutoff(cutoff).map_err(invalid)?;
    }
    for (pair, cutoff) in &file_bonds.pairs {
        thresholds = thresholds.with_pair_key(pair, *cutoff).map_err(invalid)?;
    }
    Ok(thresholds)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "reference-frame" => {
                config.reference_frame = Some(parse_value(key, value_str, "integer")?);
            }
            "trajectory.timestep-fs" => {
                config
                    .trajectory
                    .get_or_insert_with(Default::default)
                    .timestep_fs = Some(parse_value(key, value_str, "float")?);
            }
            "analysis.twist-method" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .twist_method = Some(value_str.trim().to_string());
            }
            "outliers.threshold-sigma" => {
                config
                    .outliers
                    .get_or_insert_with(Default::default)
                    .threshold_sigma = Some(parse_value(key, value_str, "float")?);
            }
            "outliers.max-key-frames" => {
                config
                    .outliers
                    .get_or_insert_with(Default::default)
                    .max_key_frames = Some(parse_value(key, value_str, "integer")?);
            }
            "outliers.parameters" => {
                config
                    .outliers
                    .get_or_insert_with(Default::default)
                    .parameters = Some(
                    value_str
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                );
            }
            "bonds.default" => {
                config.bonds.get_or_insert_with(Default::default).default =
                    Some(parse_value(key, value_str, "float")?);
            }
            "bonds.hydrogen" => {
                config.bonds.get_or_insert_with(Default::default).hydrogen =
                    Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                if let Some(pair) = key.strip_prefix("bonds.pairs.") {
                    let cutoff = parse_value(key, value_str, "float")?;
                    config
                        .bonds
                        .get_or_insert_with(Default::default)
                        .pairs
                        .insert(pair.to_string(), cutoff);
                } else {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
    }
    Ok(config)
}
