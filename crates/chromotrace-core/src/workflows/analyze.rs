use crate::core::models::analysis::{ANALYSIS_TYPE, AnalysisMetadata, TrajectoryAnalysis};
use crate::core::models::fragments::FragmentMapping;
use crate::core::models::frame::TrajectoryFrame;
use crate::core::models::geometry::GeometryRecord;
use crate::engine::config::{AnalysisConfig, FragmentSource};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::frame_geometry::{GeometryError, compute_frame};
use crate::engine::tasks::statistics::{compute_statistics, identify_key_frames};
use crate::engine::tasks::structure::compute_structure;
use crate::workflows::detect;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Analyzes every frame of a trajectory.
///
/// The fragment mapping is resolved once, before any per-frame work. A frame that cannot
/// be analyzed yields a failed record in its slot, so the result always holds exactly one
/// record per input frame.
///
/// # Errors
///
/// Fails without producing records when the trajectory is empty, when fragment detection
/// fails, or when a manual mapping does not fit the reference frame.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(
    frames: &[TrajectoryFrame],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<TrajectoryAnalysis, EngineError> {
    if frames.is_empty() {
        return Err(EngineError::EmptyTrajectory);
    }
    info!(
        frames = frames.len(),
        method = %config.twist_method,
        "Starting trajectory analysis."
    );

    // === Phase 1: Fragment mapping ===
    reporter.report(Progress::PhaseStart {
        name: "Fragment Identification",
    });
    let (mapping, reference) = resolve_mapping(frames, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Per-frame geometry ===
    reporter.report(Progress::PhaseStart {
        name: "Frame Geometry",
    });
    let geometry_data = compute_records(frames, &mapping, reference, config, reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Statistics and key frames ===
    reporter.report(Progress::PhaseStart { name: "Statistics" });
    let parameter_statistics = compute_statistics(&geometry_data);
    let key_frames = identify_key_frames(&geometry_data, &parameter_statistics, &config.outliers);
    let structure = compute_structure(frames);
    if structure.is_none() {
        warn!("First frame is not a usable reference; structural statistics skipped.");
    }
    reporter.report(Progress::PhaseFinish);

    let failed_frames = geometry_data.iter().filter(|r| r.analysis_failed).count();
    let metadata = AnalysisMetadata {
        analysis_type: ANALYSIS_TYPE,
        twist_method: config.twist_method.to_string(),
        total_frames: geometry_data.len(),
        successful_frames: geometry_data.len() - failed_frames,
        failed_frames,
        parameter_statistics,
        key_frames,
        structure,
    };

    info!(
        successful = metadata.successful_frames,
        failed = metadata.failed_frames,
        key_frames = metadata.key_frames.len(),
        "Trajectory analysis complete."
    );
    Ok(TrajectoryAnalysis {
        geometry_data,
        fragment_mapping: mapping,
        metadata,
    })
}

/// Returns the mapping and the frame whose atom list every other frame must repeat.
fn resolve_mapping<'a>(
    frames: &'a [TrajectoryFrame],
    config: &AnalysisConfig,
) -> Result<(FragmentMapping, &'a TrajectoryFrame), EngineError> {
    match &config.fragments {
        FragmentSource::AutoDetect { reference_frame } => {
            let frame = frames.get(*reference_frame).ok_or(
                EngineError::ReferenceFrameOutOfRange {
                    index: *reference_frame,
                    frame_count: frames.len(),
                },
            )?;
            let mapping = detect::run(frame, &config.bond_thresholds)?;
            Ok((mapping, frame))
        }
        FragmentSource::Manual(mapping) => {
            let frame = frames.first().ok_or(EngineError::EmptyTrajectory)?;
            mapping.validate(&frame.symbols)?;
            info!(?mapping, "Using manual fragment mapping.");
            Ok((mapping.clone(), frame))
        }
    }
}

fn compute_records(
    frames: &[TrajectoryFrame],
    mapping: &FragmentMapping,
    reference: &TrajectoryFrame,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Vec<GeometryRecord> {
    reporter.report(Progress::TaskStart {
        total_steps: frames.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = frames.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = frames.par_iter().enumerate();

    let records: Vec<GeometryRecord> = iterator
        .map(|(index, frame)| {
            let record = analyze_frame(index, frame, mapping, &reference.symbols, config);
            reporter.report(Progress::TaskIncrement);
            record
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    for record in records.iter().filter(|r| r.analysis_failed) {
        let reason = record.failure_reason.clone().unwrap_or_default();
        warn!(frame = record.frame_index, %reason, "Frame analysis failed.");
        reporter.report(Progress::FrameFailed {
            frame: record.frame_index,
            reason,
        });
    }
    records
}

fn analyze_frame(
    index: usize,
    frame: &TrajectoryFrame,
    mapping: &FragmentMapping,
    reference_symbols: &[String],
    config: &AnalysisConfig,
) -> GeometryRecord {
    let result = check_atoms(frame, reference_symbols)
        .and_then(|()| compute_frame(mapping, &frame.coords, config.twist_method));

    match result {
        Ok(parameters) => GeometryRecord::success(index, frame.time_fs, parameters),
        Err(e) => GeometryRecord::failure(index, frame.time_fs, e.to_string()),
    }
}

/// A frame must list the same elements in the same order as the reference frame.
fn check_atoms(
    frame: &TrajectoryFrame,
    reference_symbols: &[String],
) -> Result<(), GeometryError> {
    let expected = reference_symbols.len();
    let found = frame.symbols.len().max(frame.coords.len());
    if !frame.is_consistent() || found != expected {
        return Err(GeometryError::AtomCountMismatch { expected, found });
    }
    match frame
        .symbols
        .iter()
        .zip(reference_symbols)
        .position(|(symbol, reference)| symbol != reference)
    {
        Some(atom) => Err(GeometryError::SymbolMismatch {
            atom,
            expected: reference_symbols[atom].clone(),
            found: frame.symbols[atom].clone(),
        }),
        None => Ok(()),
    }
}
