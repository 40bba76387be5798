use chromotrace::engine::config::TwistMethod;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Chromotrace Developers",
    version,
    about = "Chromotrace CLI - Tracks donor-acceptor geometry (twist, planarity, pyramidalization) along molecular-dynamics trajectories of push-pull chromophores.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze every frame of a trajectory and export geometry parameters.
    Analyze(AnalyzeArgs),
    /// Detect ring, donor and acceptor fragments and print the mapping as TOML.
    Detect(DetectArgs),
    /// Compare the twist-angle formulas on a single frame.
    Diagnose(DiagnoseArgs),
}

fn parse_twist_method(s: &str) -> Result<TwistMethod, String> {
    s.parse().map_err(|e: chromotrace::engine::config::ConfigError| e.to_string())
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    // --- Core Arguments ---
    /// Path to the input trajectory in multi-frame XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON result (records, fragment mapping and metadata).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path for the per-frame CSV table.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Analysis Overrides ---
    /// Twist-angle formula: default, dihedral or plane.
    #[arg(short = 'm', long, value_name = "METHOD", value_parser = parse_twist_method)]
    pub twist_method: Option<TwistMethod>,

    /// Time between frames in femtoseconds.
    #[arg(short = 't', long, value_name = "FS")]
    pub timestep_fs: Option<f64>,

    /// Use a fragment mapping from a TOML file instead of auto-detection.
    #[arg(long, value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Frame used for fragment auto-detection.
    #[arg(long, value_name = "INDEX")]
    pub reference_frame: Option<usize>,

    /// Bond threshold table in TOML format.
    #[arg(long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,

    // --- Outlier Overrides ---
    /// Z-score above which a frame is reported as a key frame.
    #[arg(long, value_name = "SIGMA")]
    pub threshold_sigma: Option<f64>,

    /// Maximum number of key frames to report.
    #[arg(long, value_name = "INT")]
    pub max_key_frames: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S outliers.threshold-sigma=2.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Path to the input trajectory in multi-frame XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write the mapping to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Frame to run detection on.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub frame: usize,

    /// Bond threshold table in TOML format.
    #[arg(long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,
}

/// Arguments for the `diagnose` subcommand.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Path to the input trajectory in multi-frame XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Frame to diagnose.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub frame: usize,

    /// Use a fragment mapping from a TOML file instead of detecting one on the frame.
    #[arg(long, value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Bond threshold table in TOML format.
    #[arg(long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_overrides() {
        let cli = Cli::parse_from([
            "chromotrace",
            "-vv",
            "analyze",
            "-i",
            "traj.xyz",
            "-o",
            "out.json",
            "--csv",
            "out.csv",
            "-m",
            "dihedral",
            "-S",
            "outliers.max-key-frames=5",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Analyze(args) = cli.command else {
            panic!("Expected 'analyze' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("traj.xyz"));
        assert_eq!(args.twist_method, Some(TwistMethod::Dihedral));
        assert_eq!(args.set_values, vec!["outliers.max-key-frames=5"]);
    }

    #[test]
    fn rejects_unknown_twist_method() {
        let result = Cli::try_parse_from(["chromotrace", "analyze", "-i", "t.xyz", "-m", "bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["chromotrace", "-q", "-v", "detect", "-i", "t.xyz"]);
        assert!(result.is_err());
    }

    #[test]
    fn detect_defaults_to_first_frame() {
        let cli = Cli::parse_from(["chromotrace", "detect", "-i", "t.xyz"]);
        let Commands::Detect(args) = cli.command else {
            panic!("Expected 'detect' subcommand");
        };
        assert_eq!(args.frame, 0);
        assert!(args.output.is_none());
    }
}
