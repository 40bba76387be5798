//! # Topology Module
//!
//! Everything the analysis knows about how atoms are connected.
//!
//! ## Overview
//!
//! Trajectory files carry no bond information, so connectivity is inferred once, from the
//! reference frame, by comparing interatomic distances against per-element-pair
//! thresholds. The resulting bond graph is then searched for the donor–π–acceptor pattern.
//!
//! ## Key Components
//!
//! - [`registry`] - Bond distance thresholds keyed by element pair, loadable from TOML
//! - [`connectivity`] - The symmetric bond graph derived from one frame
//! - [`detector`] - Ring, donor and acceptor detection producing a `FragmentMapping`
//!
//! ## Usage
//!
//! ```ignore
//! use chromotrace::core::topology::{connectivity::ConnectivityGraph, detector, registry::BondThresholds};
//!
//! let thresholds = BondThresholds::default();
//! let graph = ConnectivityGraph::build(&frame, &thresholds)?;
//! let mapping = detector::detect_fragments(&frame.symbols, &graph)?;
//! ```

pub mod connectivity;
pub mod detector;
pub mod registry;
