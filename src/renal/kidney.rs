//! Whole-body adapter for the single-nephron model.
//!
//! Translates the circulation's state into nephron inputs, solves one nephron
//! and scales the results up to whole-kidney blood flow and distal delivery.

use crate::config::{NephronConfig, Parameters};
use crate::integrator::SolverStats;
use crate::renal::distal;
use crate::renal::nephron::{NephronParams, NephronSolution, NephronSolver, NephronStats};
use crate::renal::RenalModel;
use crate::state::Variables;

/// Nephrons per kidney mass unit, fitted so the mean renal blood flow matches
/// the whole-kidney model.
const NEPHRON_SCALE: f64 = 2e6 * 3.531067;
/// Mean ascending-limb flow that maps onto unit macula densa flow.
const QALH_PER_MDFLW: f64 = 5.077413;

#[derive(Debug, Clone, Default)]
pub struct NephronRenal {
    solver: NephronSolver,
}

impl NephronRenal {
    pub fn new(config: NephronConfig) -> Self {
        Self {
            solver: NephronSolver::new(config),
        }
    }

    pub fn nephron_stats(&self) -> &NephronStats {
        self.solver.stats()
    }
}

impl RenalModel for NephronRenal {
    fn name(&self) -> &'static str {
        "nephron"
    }

    fn update(&mut self, p: &Parameters, v: &mut Variables) {
        let params = translate_state(p, v);
        let s = self.solver.solve(&params, v.Pas);
        store_solution(&s, v);

        v.mdflw = if p.glmcubic > 0.0 {
            -3374.8165 + 1978.1256 * v.Qalh - 386.4192 * v.Qalh * v.Qalh
                + 25.1648 * v.Qalh * v.Qalh * v.Qalh
        } else {
            v.Qalh / QALH_PER_MDFLW
        };

        let scale = NEPHRON_SCALE * p.rek;
        v.rbf = 1e-9 * (v.Pas - v.Pg0) / v.Ra * scale;
        if v.rbf < 0.0 {
            v.rbf = 0.0;
        }

        let delivered = scale * 1e-9 * v.Qalh;
        let out = distal::excrete(delivered, v.Ci, v.cke, v.cna);
        v.nod = out.sodium;
        v.kod = out.potassium;
        v.vud = out.volume;
    }

    fn stats(&self) -> Vec<SolverStats> {
        let n = self.solver.stats();
        vec![SolverStats {
            name: "nephron_shooting",
            calls: n.solves,
            iterations: n.shooting_iterations,
            exhausted: n.shooting_cap_hits,
            max_iterations: n.max_shooting_iterations,
        }]
    }
}

/// Renal arterial pressure and the locally scaled nephron constants.
fn translate_state(p: &Parameters, v: &mut Variables) -> NephronParams {
    v.Pas = if p.raprsp > 0.0 { p.raprsp } else { v.pa - v.gbl };
    if v.rfcdft > 0.0 {
        // Drift is measured against the whole-kidney perfusion pressure
        v.Pas += ((100.0 + (v.Pas - 100.0) * p.rcdfpc) - v.par) / p.rcdfdp * v.i;
    }

    v.aumk = (v.aum - 1.0) * p.arf + 1.0;
    if v.aumk < 0.8 {
        v.aumk = 0.8;
    }
    v.anmer = (v.anm - 1.0) * p.anmem + 1.0;
    v.anmar = (v.anm - 1.0) * p.anmam + 1.0;
    if v.anmar < p.anmarl {
        v.anmar = p.anmarl;
    }

    let mut params = NephronParams::from(p);
    // g/l to g/dl
    params.C0 = v.cpp * 0.1;
    params.Rb = 0.3 * p.aark * v.pamkrn * v.aumk * v.anmar
        - (v.anpx * p.anpxaf + p.anpxaf) * 0.008;
    params.Re = 0.3 * p.eark * ((v.aumk - 1.0) * p.aumk1 + 1.0) * v.anmer;
    params
}

fn store_solution(s: &NephronSolution, v: &mut Variables) {
    v.Ra = s.Ra;
    v.Pg0 = s.Pg0;
    v.GFR = s.GFR;
    v.Qalh = s.Qalh;
    v.Calh = s.Calh;
    v.Ci = s.Ci;
    v.dRtgf = s.dRtgf;
    v.dRma = s.dRma;
    v.dRmd = s.dRmd;
}
