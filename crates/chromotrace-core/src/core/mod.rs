//! # Core Module
//!
//! Fundamental building blocks of the geometry analysis: data models, the connectivity
//! graph and fragment detection, geometric primitives and file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Trajectory frames, fragment mappings and
//!   per-frame geometry records
//! - **Structural Knowledge** ([`topology`]) - Bond thresholds, the distance-derived bond
//!   graph and the donor–π–acceptor fragment detector
//! - **Geometry** ([`utils`]) - Plane fitting, vector–plane angles and dihedrals
//! - **File I/O** ([`io`]) - XYZ trajectory reading and CSV/JSON export
//!
//! Nothing in this layer keeps state between calls; the fragment mapping is computed once
//! and passed explicitly to everything that needs it.

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;
