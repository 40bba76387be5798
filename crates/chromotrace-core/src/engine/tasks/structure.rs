use crate::core::models::elements::{atomic_mass, element_types, molecular_formula};
use crate::core::models::frame::TrajectoryFrame;
use crate::core::models::structure::{
    AxisBounds, CenterOfMassSummary, MotionSummary, RmsdSummary, StructuralStatistics,
};
use crate::core::utils::geometry::centroid;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

struct FrameSample {
    index: usize,
    time_fs: f64,
    center_of_mass: Point3<f64>,
    rmsd: f64,
}

/// Mass-weighted center of a set of atoms, `None` for an empty set.
pub fn center_of_mass(symbols: &[String], coords: &[Point3<f64>]) -> Option<Point3<f64>> {
    let (total_mass, weighted) = symbols.iter().zip(coords).fold(
        (0.0, Vector3::<f64>::zeros()),
        |(total, sum), (symbol, point)| {
            let mass = atomic_mass(symbol);
            (total + mass, sum + point.coords * mass)
        },
    );
    (total_mass > 0.0).then(|| Point3::from(weighted / total_mass))
}

/// RMSD between two conformations after moving both centroids to the origin. No rotational
/// fit is applied, so a rigid rotation shows up as deviation.
pub fn centered_rmsd(reference: &[Point3<f64>], coords: &[Point3<f64>]) -> Option<f64> {
    if reference.len() != coords.len() {
        return None;
    }
    let reference_center = centroid(reference)?;
    let center = centroid(coords)?;
    let squared: f64 = reference
        .iter()
        .zip(coords)
        .map(|(a, b)| ((a - reference_center) - (b - center)).norm_squared())
        .sum();
    Some((squared / coords.len() as f64).sqrt())
}

fn has_finite_coords(frame: &TrajectoryFrame) -> bool {
    frame
        .coords
        .iter()
        .all(|p| p.coords.iter().all(|c| c.is_finite()))
}

fn is_comparable(frame: &TrajectoryFrame, reference: &TrajectoryFrame) -> bool {
    frame.is_consistent() && frame.symbols == reference.symbols && has_finite_coords(frame)
}

fn sample(
    index: usize,
    frame: &TrajectoryFrame,
    reference: &TrajectoryFrame,
) -> Option<FrameSample> {
    if !is_comparable(frame, reference) {
        return None;
    }
    Some(FrameSample {
        index,
        time_fs: frame.time_fs,
        center_of_mass: center_of_mass(&frame.symbols, &frame.coords)?,
        rmsd: centered_rmsd(&reference.coords, &frame.coords)?,
    })
}

fn axis_bounds<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> AxisBounds {
    let mut bounds = AxisBounds {
        min: [f64::INFINITY; 3],
        max: [f64::NEG_INFINITY; 3],
    };
    for point in points {
        for axis in 0..3 {
            bounds.min[axis] = bounds.min[axis].min(point[axis]);
            bounds.max[axis] = bounds.max[axis].max(point[axis]);
        }
    }
    bounds
}

fn summarize_center_of_mass(samples: &[FrameSample]) -> CenterOfMassSummary {
    let n = samples.len() as f64;
    let mean: Vector3<f64> = samples
        .iter()
        .map(|s| s.center_of_mass.coords)
        .sum::<Vector3<f64>>()
        / n;
    let variance: Vector3<f64> = samples
        .iter()
        .map(|s| (s.center_of_mass.coords - mean).map(|d| d * d))
        .sum::<Vector3<f64>>()
        / n;

    CenterOfMassSummary {
        mean: mean.into(),
        std: variance.map(f64::sqrt).into(),
        range: axis_bounds(samples.iter().map(|s| &s.center_of_mass)),
    }
}

fn summarize_rmsd(samples: &[FrameSample], frame_count: usize) -> RmsdSummary {
    let mut values = vec![f64::NAN; frame_count];
    for s in samples {
        values[s.index] = s.rmsd;
    }
    let mean = samples.iter().map(|s| s.rmsd).sum::<f64>() / samples.len() as f64;
    let max = samples.iter().map(|s| s.rmsd).fold(0.0, f64::max);
    let last = samples.last().map_or(f64::NAN, |s| s.rmsd);
    RmsdSummary {
        values,
        mean,
        max,
        last,
    }
}

/// Displacements between frames `i` and `i + 1` when both were sampled.
fn summarize_motion(
    samples: &[FrameSample],
    frames: &[TrajectoryFrame],
) -> Option<MotionSummary> {
    let mut steps = 0;
    let mut displacements = Vec::new();
    let mut speeds = Vec::new();

    for pair in samples.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        if after.index != before.index + 1 {
            continue;
        }
        steps += 1;
        let dt = after.time_fs - before.time_fs;
        let step: Vec<f64> = frames[before.index]
            .coords
            .iter()
            .zip(&frames[after.index].coords)
            .map(|(a, b)| (b - a).norm())
            .collect();
        if dt > 0.0 {
            speeds.extend(step.iter().map(|d| d / dt));
        }
        displacements.extend(step);
    }

    if steps == 0 || displacements.is_empty() {
        return None;
    }
    let mean = |values: &[f64]| match values.len() {
        0 => f64::NAN,
        n => values.iter().sum::<f64>() / n as f64,
    };
    Some(MotionSummary {
        steps,
        mean_displacement_per_step: mean(&displacements),
        max_displacement_per_step: displacements.iter().copied().fold(0.0, f64::max),
        mean_velocity: mean(&speeds),
    })
}

/// Structural statistics of the whole trajectory, using the first frame as reference.
///
/// Returns `None` when the first frame itself cannot serve as a reference (no atoms,
/// mismatched symbol and coordinate counts, or non-finite coordinates).
#[instrument(skip_all, name = "structure_task")]
pub fn compute_structure(frames: &[TrajectoryFrame]) -> Option<StructuralStatistics> {
    let reference = frames.first()?;
    if reference.coords.is_empty() || !is_comparable(reference, reference) {
        return None;
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = frames.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = frames.par_iter().enumerate();

    let samples: Vec<FrameSample> = iterator
        .filter_map(|(index, frame)| sample(index, frame, reference))
        .collect();
    let (first, last) = (samples.first()?, samples.last()?);

    let statistics = StructuralStatistics {
        atom_count: reference.atom_count(),
        molecular_formula: molecular_formula(&reference.symbols),
        atom_types: element_types(&reference.symbols),
        frames_used: samples.len(),
        skipped_frames: frames.len() - samples.len(),
        time_range_fs: [first.time_fs, last.time_fs],
        coordinate_bounds: axis_bounds(samples.iter().flat_map(|s| &frames[s.index].coords)),
        center_of_mass: summarize_center_of_mass(&samples),
        rmsd: summarize_rmsd(&samples, frames.len()),
        motion: summarize_motion(&samples, frames),
    };

    debug!(
        frames_used = statistics.frames_used,
        skipped = statistics.skipped_frames,
        rmsd_max = statistics.rmsd.max,
        "Structural statistics complete."
    );
    Some(statistics)
}
