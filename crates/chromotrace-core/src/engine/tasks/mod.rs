//! Computational tasks of the analysis pass.
//!
//! [`frame_geometry`] turns one frame's coordinates into order parameters using a fixed
//! fragment mapping; [`statistics`] aggregates finished records and screens them for outlier
//! frames; [`structure`] summarizes the raw coordinates (RMSD, center of mass, motion)
//! without reference to any fragment.

pub mod frame_geometry;
pub mod statistics;
pub mod structure;
