//! Offline analyses that exercise individual modules outside a full run.

pub mod moore_sweep;
pub mod sensitivity;

pub use sensitivity::{run_sweep, Sweep, SweepFiles};
