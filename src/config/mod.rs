//! Configuration: model parameters and engine settings.
//!
//! Parameter values carry their literature source where one exists.

mod engine;
mod parameters;

pub use engine::{EngineConfig, NephronConfig};
pub use parameters::{load_overrides, read_overrides, ConfigError, Parameters};
