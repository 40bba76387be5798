//! Provides input/output for trajectories and analysis results.
//!
//! Trajectories are read through the [`traits::TrajectoryFile`] interface (currently
//! implemented for multi-frame XYZ). Finished analyses are rendered by [`export`] as CSV
//! tables or structured JSON.

pub mod export;
pub mod traits;
pub mod xyz;
