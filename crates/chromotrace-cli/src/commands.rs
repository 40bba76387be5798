pub mod analyze;
pub mod detect;
pub mod diagnose;

use crate::error::{CliError, Result};
use chromotrace::core::io::traits::{ReadOptions, TrajectoryFile};
use chromotrace::core::io::xyz::XyzFile;
use chromotrace::core::models::frame::{Trajectory, TrajectoryFrame};
use std::path::Path;
use tracing::{info, warn};

fn read_trajectory(path: &Path, options: &ReadOptions) -> Result<Trajectory> {
    info!("Loading trajectory from {:?}", path);
    let trajectory =
        XyzFile::read_from_path(path, options).map_err(|source| CliError::Trajectory {
            path: path.to_path_buf(),
            source,
        })?;

    for issue in trajectory.validate() {
        warn!("{}", issue);
    }
    info!("Loaded {} frame(s).", trajectory.len());
    Ok(trajectory)
}

fn select_frame(trajectory: &Trajectory, index: usize) -> Result<&TrajectoryFrame> {
    trajectory.frame(index).ok_or_else(|| {
        CliError::Argument(format!(
            "Frame {} does not exist; the trajectory has {} frame(s).",
            index,
            trajectory.len()
        ))
    })
}
