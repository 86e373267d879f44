//! Simulation state: model variables and by-name access to the state store.

pub mod registry;
mod variables;

pub use registry::{ModelState, Registry, RegistryError, StateRegistry};
pub use variables::Variables;
