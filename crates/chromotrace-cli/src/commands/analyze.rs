use super::read_trajectory;
use crate::cli::AnalyzeArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chromotrace::core::io::export;
use chromotrace::core::models::analysis::TrajectoryAnalysis;
use chromotrace::core::models::geometry::GeometryParameter;
use chromotrace::engine::progress::ProgressReporter;
use chromotrace::workflows;
use std::fmt::Write;
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let trajectory = read_trajectory(&app.input_path, &app.read_options)?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Analyzing {} frame(s) with the '{}' twist method...",
        trajectory.len(),
        app.core_config.twist_method
    );
    let analysis = workflows::analyze::run(trajectory.frames(), &app.core_config, &reporter)?;

    print!("{}", format_summary(&analysis));

    if let Some(path) = &app.json_output {
        export::write_json_to_path(&analysis, path)?;
        info!("Wrote JSON results to {:?}", path);
        println!("✓ JSON results written to: {}", path.display());
    }
    if let Some(path) = &app.csv_output {
        export::write_csv_to_path(&analysis.geometry_data, path)?;
        info!("Wrote CSV table to {:?}", path);
        println!("✓ CSV table written to: {}", path.display());
    }
    if app.json_output.is_none() && app.csv_output.is_none() {
        warn!("No output file requested; only the summary was printed.");
        println!("Hint: pass --output <PATH> and/or --csv <PATH> to save the results.");
    }

    Ok(())
}

/// Human-readable overview of an analysis: frame counts, statistics and key frames.
pub fn format_summary(analysis: &TrajectoryAnalysis) -> String {
    let metadata = &analysis.metadata;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Frames: {} total, {} analyzed, {} failed",
        metadata.total_frames, metadata.successful_frames, metadata.failed_frames
    );

    if !metadata.parameter_statistics.is_empty() {
        let _ = writeln!(
            out,
            "{:<26}{:>12}{:>12}{:>12}{:>12}",
            "parameter", "mean", "std", "min", "max"
        );
        for parameter in GeometryParameter::ALL {
            if let Some(stats) = analysis.statistics(parameter) {
                let _ = writeln!(
                    out,
                    "{:<26}{:>12.4}{:>12.4}{:>12.4}{:>12.4}",
                    parameter.name(),
                    stats.mean,
                    stats.std,
                    stats.min,
                    stats.max
                );
            }
        }
    }

    if let Some(structure) = &metadata.structure {
        let _ = writeln!(
            out,
            "Molecule: {} ({} atoms, {} of {} frames compared)",
            structure.molecular_formula,
            structure.atom_count,
            structure.frames_used,
            metadata.total_frames
        );
        let _ = writeln!(
            out,
            "RMSD vs first frame: mean {:.4} Å, max {:.4} Å, final {:.4} Å",
            structure.rmsd.mean, structure.rmsd.max, structure.rmsd.last
        );
        if let Some(motion) = &structure.motion {
            let _ = writeln!(
                out,
                "Motion per step: mean {:.4} Å, max {:.4} Å, mean speed {:.4} Å/fs",
                motion.mean_displacement_per_step,
                motion.max_displacement_per_step,
                motion.mean_velocity
            );
        }
    }

    if metadata.key_frames.is_empty() {
        let _ = writeln!(out, "No key frames above the outlier threshold.");
    } else {
        let _ = writeln!(out, "Key frames:");
        for key in &metadata.key_frames {
            let _ = writeln!(
                out,
                "  frame {:>6} ({:>10.2} fs)  {}",
                key.frame_index, key.time_fs, key.description
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::test_support::write_planar_trajectory;
    use clap::Parser;
    use tempfile::tempdir;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let mut full = vec!["chromotrace", "analyze"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Analyze(args) => args,
            _ => panic!("Expected 'analyze' subcommand"),
        }
    }

    #[test]
    fn writes_json_and_csv_outputs() {
        let dir = tempdir().unwrap();
        let input = write_planar_trajectory(dir.path(), 3);
        let json = dir.path().join("out.json");
        let csv = dir.path().join("out.csv");

        let args = analyze_args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            json.to_str().unwrap(),
            "--csv",
            csv.to_str().unwrap(),
        ]);
        run(args, true).unwrap();

        let table = std::fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("frame,time_fs,time_ps,twist_angle"));
        assert!(lines[2].starts_with("1,0.50,0.000500,0.0000,"));

        let document = std::fs::read_to_string(&json).unwrap();
        assert!(document.contains("\"analysis_type\": \"donor_acceptor_geometry\""));
        assert!(document.contains("\"failed_frames\": 0"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.xyz");
        let args = analyze_args(&["-i", missing.to_str().unwrap()]);
        assert!(run(args, true).is_err());
    }

    #[test]
    fn summary_lists_counts_and_statistics() {
        let dir = tempdir().unwrap();
        let input = write_planar_trajectory(dir.path(), 2);
        let app = build_config(&analyze_args(&["-i", input.to_str().unwrap()])).unwrap();
        let trajectory = read_trajectory(&app.input_path, &app.read_options).unwrap();
        let analysis = workflows::analyze::run(
            trajectory.frames(),
            &app.core_config,
            &ProgressReporter::new(),
        )
        .unwrap();

        let summary = format_summary(&analysis);
        assert!(summary.starts_with("Frames: 2 total, 2 analyzed, 0 failed"));
        assert!(summary.contains("donor_acceptor_distance"));
        assert!(summary.contains("No key frames"));
        assert!(summary.contains("Molecule: C9H4N2 (15 atoms, 2 of 2 frames compared)"));
        assert!(summary.contains("RMSD vs first frame: mean 0.0000 Å"));
        assert!(summary.contains("Motion per step: mean 0.0000 Å"));
    }
}
