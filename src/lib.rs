//! Body Simulator X - whole-body physiology simulation engine
//!
//! This library implements the Guyton 1992 model of circulatory, renal,
//! hormonal and fluid regulation, integrated with a multirate adaptive
//! scheme, and a replacement single-nephron kidney (Moore 1994).

// Allow non-snake-case for model names (GFR, Qalh, Pas, ...)
// This follows the published model's notation.
#![allow(non_snake_case)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod experiment;
pub mod export;
pub mod instrument;
pub mod integrator;
pub mod physiology;
pub mod renal;
pub mod state;

pub use config::{EngineConfig, NephronConfig, Parameters};
pub use engine::{Module, Pipeline, Simulation, SolverDiagnostics};
pub use experiment::Experiment;
pub use instrument::{Filter, Instrument, InstrumentBus, Observation};
pub use integrator::{EquilibriumSolver, FastEquilibrator, StepController};
pub use renal::{LegacyRenal, NephronRenal, NephronSolver, RenalModel, RenalSelector};
pub use state::{ModelState, StateRegistry, Variables};
