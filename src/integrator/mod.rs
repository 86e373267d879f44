//! Time integration: the fast circulatory equilibrator, slow step control,
//! the shared equilibrium-solver loop and function-table interpolation.

mod equilibrator;
mod equilibrium;
mod piecewise;
mod step_control;

pub use equilibrator::{is_stable, FastEquilibrator, MicroStep};
pub use equilibrium::{EquilibriumSolver, SolverStats, Termination};
pub use piecewise::{funct, lookup};
pub use step_control::{StepController, StepProposal, GROWTH};
