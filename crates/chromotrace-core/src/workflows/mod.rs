//! # Workflows Module
//!
//! Public entry points of the library. Each workflow validates its inputs, reports progress
//! and returns a finished result; none of them touch the filesystem.
//!
//! - **Detection** ([`detect`]) - Builds the bond graph of a reference frame and identifies
//!   the ring, donor and acceptor fragments.
//! - **Analysis** ([`analyze`]) - The full trajectory pass: one fragment mapping, one
//!   geometry record per frame, statistics and key frames.
//! - **Diagnostics** ([`diagnose`]) - Compares the twist-angle formulas on a single frame.
//!
//! Detection happens exactly once per trajectory and must succeed before any per-frame work
//! starts; the resulting mapping is passed explicitly to everything downstream.

pub mod analyze;
pub mod detect;
pub mod diagnose;
