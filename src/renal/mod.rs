//! Renal submodels.
//!
//! Two interchangeable kidney implementations share the slot between the
//! pulmonary and electrolyte modules of the slow pipeline:
//! - Legacy: the whole-kidney Guyton 1992 model with autoregulation and
//!   urinary excretion loops
//! - Nephron: the Moore & Casellas (1994) single-nephron model, scaled to
//!   the whole kidney and followed by a fixed distal excretion chain
//!
//! The parameter `newkidney` picks one per step. Both write the same outputs
//! (`rbf`, `mdflw`, `nod`, `kod`, `vud`), so the rest of the body never knows
//! which one ran.
//!
//! References:
//! - Moore LC, Casellas D, Leyssac PP. Ann Biomed Eng. 1994;22:391-404

pub mod distal;
pub mod kidney;
pub mod legacy;
pub mod nephron;

pub use kidney::NephronRenal;
pub use legacy::LegacyRenal;
pub use nephron::{NephronParams, NephronSolution, NephronSolver, NephronStats};

use crate::config::{NephronConfig, Parameters};
use crate::integrator::SolverStats;
use crate::state::Variables;

/// A kidney implementation usable in the renal slot.
pub trait RenalModel: Send + Sync {
    /// Name of the model for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Computes renal blood flow, macula densa flow and excretion rates.
    fn update(&mut self, p: &Parameters, v: &mut Variables);

    /// Counters for each named solver loop the model owns.
    fn stats(&self) -> Vec<SolverStats>;
}

/// Outputs compared by shadow execution.
fn renal_outputs(v: &Variables) -> [(&'static str, f64); 5] {
    [
        ("rbf", v.rbf),
        ("mdflw", v.mdflw),
        ("nod", v.nod),
        ("kod", v.kod),
        ("vud", v.vud),
    ]
}

/// Picks the active kidney from `newkidney`, optionally running the other one
/// on a copy of the state for comparison.
#[derive(Debug, Clone, Default)]
pub struct RenalSelector {
    legacy: LegacyRenal,
    nephron: NephronRenal,
    pub shadow: bool,
}

impl RenalSelector {
    pub fn new(config: NephronConfig, shadow: bool) -> Self {
        Self {
            legacy: LegacyRenal::default(),
            nephron: NephronRenal::new(config),
            shadow,
        }
    }

    pub fn uses_nephron(p: &Parameters) -> bool {
        p.newkidney > 0.0
    }

    pub fn update(&mut self, p: &Parameters, v: &mut Variables) {
        let nephron = Self::uses_nephron(p);
        if self.shadow {
            let mut copy = v.clone();
            if nephron {
                self.legacy.update(p, &mut copy);
            } else {
                self.nephron.update(p, &mut copy);
            }
            self.active(nephron).update(p, v);
            log_differences(self.active(!nephron).name(), v, &copy);
        } else {
            self.active(nephron).update(p, v);
        }
    }

    fn active(&mut self, nephron: bool) -> &mut dyn RenalModel {
        if nephron {
            &mut self.nephron
        } else {
            &mut self.legacy
        }
    }

    pub fn nephron_mut(&mut self) -> &mut NephronRenal {
        &mut self.nephron
    }

    pub fn nephron_stats(&self) -> &NephronStats {
        self.nephron.nephron_stats()
    }

    pub fn stats(&self) -> Vec<SolverStats> {
        let mut out = self.legacy.stats();
        out.extend(self.nephron.stats());
        out
    }
}

fn log_differences(shadow: &str, active: &Variables, other: &Variables) {
    for ((name, a), (_, b)) in renal_outputs(active).into_iter().zip(renal_outputs(other)) {
        if a != b {
            log::debug!(
                "t={:.4} shadow {} {}: active {:.6e} shadow {:.6e}",
                active.t,
                shadow,
                name,
                a,
                b
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newkidney_switch() {
        let mut p = Parameters::default();
        let mut selector = RenalSelector::default();
        let mut v = Variables::default();
        selector.update(&p, &mut v);
        assert_eq!(v.GFR, 0.0);

        p.newkidney = 1.0;
        selector.update(&p, &mut v);
        assert!(v.GFR > 0.0);
    }

    #[test]
    fn test_shadow_leaves_state_untouched() {
        let p = Parameters::default();
        let mut plain = Variables::default();
        let mut shadowed = plain.clone();

        RenalSelector::new(NephronConfig::default(), false).update(&p, &mut plain);
        let mut selector = RenalSelector::new(NephronConfig::default(), true);
        selector.update(&p, &mut shadowed);

        assert_eq!(plain, shadowed);
        assert_eq!(selector.nephron_stats().solves, 1);
    }
}
