//! Slow-step physiology modules and the fast circulatory pair.
//!
//! Stateless modules are free `update` functions. Modules that own
//! equilibrium loops are structs so their solver counters survive between
//! steps.

pub mod adh;
pub mod aldost;
pub mod angio;
pub mod anp;
pub mod autonom;
pub mod baro;
pub mod capdyn;
pub mod circdyn;
pub mod electro;
pub mod o2deliv;
pub mod puldyn;
pub mod rbc;
pub mod special;
pub mod stress;
pub mod thirst;
pub mod volrec;

pub use electro::Electrolytes;
pub use o2deliv::OxygenDelivery;
pub use rbc::RedCells;
