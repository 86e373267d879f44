//! Electrolyte and body water balance.
//!
//! Integrates sodium, potassium and total water, then sub-steps the osmotic
//! shift between intracellular and extracellular fluid.

use crate::config::Parameters;
use crate::integrator::{EquilibriumSolver, SolverStats};
use crate::state::Variables;

#[derive(Debug, Clone)]
pub struct Electrolytes {
    osmotic_shift: EquilibriumSolver,
}

impl Default for Electrolytes {
    fn default() -> Self {
        Self {
            osmotic_shift: EquilibriumSolver::new("osmotic_shift"),
        }
    }
}

impl Electrolytes {
    pub fn update(&mut self, p: &Parameters, v: &mut Variables) {
        v.ned = p.nid * v.sth - v.nod + p.trpl * 142.0;
        v.nae += v.ned * v.i;
        v.amk1 = (v.amk - 1.0) * p.alclk + 1.0;
        v.ktotd = p.kid - v.kod;
        v.ktot += v.ktotd * v.i;
        v.vtw += (v.tvd - v.vud) * v.i;

        let budget = v.i;
        self.osmotic_shift.iterate(budget, p.i14, p.vid1, || {
            v.ke = (v.ktot - 3000.0) / v.amk1 / 9.3333;
            v.ki = v.ktot - v.ke;
            v.vec = v.vtw - v.vic;
            v.cna = v.nae / v.vec;
            v.cki = v.ki / v.vic;
            v.ccd = v.cki - v.cna;
            v.vid = v.ccd * p.vidml;
            v.vic += v.vid * p.i14;
            v.vid
        });
        v.i15 = 0.0;

        v.cke = v.ke / v.vec;
    }

    pub fn stats(&self) -> Vec<SolverStats> {
        vec![self.osmotic_shift.stats().clone()]
    }
}
