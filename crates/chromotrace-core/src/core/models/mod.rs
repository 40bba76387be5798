//! Data models shared by every layer of the analysis.
//!
//! - [`analysis`] - The trajectory-wide result handed to export
//! - [`elements`] - Atomic masses and molecular formulas
//! - [`frame`] - One snapshot of the trajectory (symbols, coordinates, time)
//! - [`fragments`] - The fixed mapping from chemical roles to atom indices
//! - [`geometry`] - Per-frame order parameters and the records built from them
//! - [`structure`] - Structural statistics of the whole trajectory (RMSD, center of mass)

pub mod analysis;
pub mod elements;
pub mod fragments;
pub mod frame;
pub mod geometry;
pub mod structure;
