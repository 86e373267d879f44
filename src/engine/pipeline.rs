//! The fixed order of slow-step modules.
//!
//! Modules read whatever their predecessors wrote this step and whatever
//! their successors wrote last step. Reordering changes the results.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::{EngineConfig, Parameters};
use crate::integrator::SolverStats;
use crate::physiology::{
    adh, aldost, angio, anp, autonom, baro, capdyn, circdyn, puldyn, special, stress, thirst,
    volrec, Electrolytes, OxygenDelivery, RedCells,
};
use crate::renal::{NephronStats, RenalModel, RenalSelector};
use crate::state::Variables;

/// Every module that can be run on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Circulation,
    Autonomic,
    Aldosterone,
    Angiotensin,
    Anp,
    RedCells,
    OxygenDelivery,
    VolumeReceptors,
    Adh,
    StressRelaxation,
    Thirst,
    Baroreceptors,
    Special,
    Capillary,
    Pulmonary,
    /// Whichever kidney `newkidney` selects
    Renal,
    /// The single-nephron kidney regardless of `newkidney`
    Kidney,
    Electrolytes,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown module '{0}'")]
pub struct UnknownModule(pub String);

impl Module {
    /// Slow modules in execution order.
    pub const SLOW_ORDER: [Module; 15] = [
        Module::Aldosterone,
        Module::Angiotensin,
        Module::Anp,
        Module::RedCells,
        Module::OxygenDelivery,
        Module::VolumeReceptors,
        Module::Adh,
        Module::StressRelaxation,
        Module::Thirst,
        Module::Baroreceptors,
        Module::Special,
        Module::Capillary,
        Module::Pulmonary,
        Module::Renal,
        Module::Electrolytes,
    ];

    pub const ALL: [Module; 18] = [
        Module::Renal,
        Module::Circulation,
        Module::Autonomic,
        Module::Aldosterone,
        Module::Angiotensin,
        Module::Anp,
        Module::RedCells,
        Module::OxygenDelivery,
        Module::VolumeReceptors,
        Module::Adh,
        Module::StressRelaxation,
        Module::Thirst,
        Module::Baroreceptors,
        Module::Special,
        Module::Capillary,
        Module::Pulmonary,
        Module::Electrolytes,
        Module::Kidney,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Module::Circulation => "circdyn",
            Module::Autonomic => "autonom",
            Module::Aldosterone => "aldost",
            Module::Angiotensin => "angio",
            Module::Anp => "anp",
            Module::RedCells => "rbc",
            Module::OxygenDelivery => "o2deliv",
            Module::VolumeReceptors => "volrec",
            Module::Adh => "adh",
            Module::StressRelaxation => "stress",
            Module::Thirst => "thirst",
            Module::Baroreceptors => "baro",
            Module::Special => "special",
            Module::Capillary => "capdyn",
            Module::Pulmonary => "puldyn",
            Module::Renal => "renal",
            Module::Kidney => "kidney",
            Module::Electrolytes => "electro",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Module {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

/// Owns the modules that keep solver state between steps.
#[derive(Debug, Clone)]
pub struct Pipeline {
    red_cells: RedCells,
    oxygen: OxygenDelivery,
    renal: RenalSelector,
    electrolytes: Electrolytes,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            red_cells: RedCells::default(),
            oxygen: OxygenDelivery::default(),
            renal: RenalSelector::new(config.nephron.clone(), config.shadow_renal),
            electrolytes: Electrolytes::default(),
        }
    }

    /// Runs every slow module once, in order.
    pub fn run(&mut self, p: &Parameters, v: &mut Variables) {
        for module in Module::SLOW_ORDER {
            self.run_module(module, p, v);
        }
    }

    pub fn run_module(&mut self, module: Module, p: &Parameters, v: &mut Variables) {
        match module {
            Module::Circulation => circdyn::update(p, v),
            Module::Autonomic => autonom::update(p, v),
            Module::Aldosterone => aldost::update(p, v),
            Module::Angiotensin => angio::update(p, v),
            Module::Anp => anp::update(p, v),
            Module::RedCells => self.red_cells.update(p, v),
            Module::OxygenDelivery => self.oxygen.update(p, v),
            Module::VolumeReceptors => volrec::update(p, v),
            Module::Adh => adh::update(p, v),
            Module::StressRelaxation => stress::update(p, v),
            Module::Thirst => thirst::update(p, v),
            Module::Baroreceptors => baro::update(p, v),
            Module::Special => special::update(p, v),
            Module::Capillary => capdyn::update(p, v),
            Module::Pulmonary => puldyn::update(p, v),
            Module::Renal => self.renal.update(p, v),
            Module::Kidney => self.renal.nephron_mut().update(p, v),
            Module::Electrolytes => self.electrolytes.update(p, v),
        }
    }

    /// Counters of every equilibrium loop, in pipeline order.
    pub fn solver_stats(&self) -> Vec<SolverStats> {
        let mut out = self.red_cells.stats();
        out.extend(self.oxygen.stats());
        out.extend(self.renal.stats());
        out.extend(self.electrolytes.stats());
        out
    }

    pub fn nephron_stats(&self) -> &NephronStats {
        self.renal.nephron_stats()
    }
}
