//! Experiments: scheduled parameter changes and built-in protocols.

mod protocols;
mod scheduler;

pub use protocols::{rapid_regulation, transfuse};
pub use scheduler::{Change, ChangeSet, Experiment, ExperimentError};
