//! # Engine Module
//!
//! Configuration, error types, progress reporting and the computational tasks that the
//! workflows string together.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Twist method, fragment source, bond thresholds and
//!   outlier screening settings, assembled through a validating builder
//! - **Error Handling** ([`error`]) - The umbrella error returned by workflows
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Tasks** ([`tasks`]) - Per-frame geometry and trajectory-wide statistics
//!
//! Per-frame work never returns an error across the aggregation boundary: a frame that
//! cannot be analyzed becomes a failed record carrying the reason.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
