//! Geometric primitives used by the per-frame calculator.

pub mod geometry;
