//! The simulation engine: the slow module pipeline and the driver that
//! interleaves it with fast circulatory equilibration.

mod diagnostics;
mod driver;
mod pipeline;

pub use diagnostics::SolverDiagnostics;
pub use driver::{Event, Phase, RunSummary, Simulation, StepOutcome};
pub use pipeline::{Module, Pipeline, UnknownModule};
