//! # Chromotrace Core Library
//!
//! Geometry analysis for molecular-dynamics trajectories of a single donor–π–acceptor
//! chromophore (the DMABN family: a dialkylamino donor and a nitrile acceptor on a benzene
//! ring). The library identifies the chemically meaningful fragments once, then measures
//! twist, planarity and related order parameters on every frame.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`TrajectoryFrame`,
//!   `FragmentMapping`, `GeometryRecord`), the bond graph and fragment detector, pure
//!   geometric routines, and trajectory/export I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error taxonomy, progress reporting and
//!   the computational tasks: per-frame geometry and trajectory-wide statistics.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie detection, the
//!   per-frame pass and aggregation together into a single `TrajectoryAnalysis`.

pub mod core;
pub mod engine;
pub mod workflows;
