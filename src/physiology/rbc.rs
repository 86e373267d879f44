//! Red cells, blood viscosity and pulmonary oxygen uptake.

use crate::config::Parameters;
use crate::integrator::{EquilibriumSolver, SolverStats};
use crate::state::Variables;

/// Red cell mass, viscosity, and the arterial PO2 loop.
#[derive(Debug, Clone)]
pub struct RedCells {
    arterial_po2: EquilibriumSolver,
}

impl Default for RedCells {
    fn default() -> Self {
        Self {
            arterial_po2: EquilibriumSolver::new("arterial_po2"),
        }
    }
}

impl RedCells {
    pub fn update(&mut self, p: &Parameters, v: &mut Variables) {
        // Hematocrit and viscosity
        v.vb = v.vp + v.vrc;
        v.hm1 = v.vrc / v.vb;
        v.hm = 100.0 * v.hm1;
        v.vie = v.hm / (p.hmk - v.hm) / v.hkm;
        v.vib = v.vie + 1.5;
        v.vim = 0.3333 * v.vib;

        // Red cell production and destruction
        v.po2am1 = if v.po2amb > 80.0 { 80.0 } else { v.po2amb };
        v.hm3 = (v.po2am1 - 40.0) * v.hm;
        v.hm4 = v.po2amb - 40.0;
        v.hm5 = v.hm3 + v.hm4;
        if v.hm5 < 0.0 {
            v.hm5 = 0.0;
        }
        v.hm7 = p.hm6 - v.hm5;
        v.rc1 = v.hm7 * p.hm8 * p.rek + 5e-6;
        if v.rc1 < 0.0 {
            v.rc1 = 0.0;
        }
        v.rc2 = v.vrc * p.rkc * v.vim;
        v.rcd = v.rc1 - v.rc2 + v.trrbc;
        v.vrc += v.rcd * v.i;

        // Alveolar ventilation
        v.o2util = v.dob + v.rmo;
        v.alvent = v.o2util * p.vntstm * 0.026667 * v.o2vts2 * v.o2vad2;
        v.po2alv = v.po2amb - v.o2util / v.alvent / 0.761;
        v.rspdfc = p.pl2 / (p.vptiss + v.vpf);

        let budget = v.i;
        self.arterial_po2.iterate(budget, p.i8, p.po2adv, || {
            v.po2ar1 = v.po2art;
            v.o2dfs = (v.po2alv - v.po2art) * v.rspdfc;
            v.dova = (v.o2dfs - v.o2util) / v.qro;
            v.ova += v.dova * p.i8;
            v.osa = v.ova / v.hm / 5.25;
            v.po2art = arterial_po2(v.osa);
            v.po2art - v.po2ar1
        });
        v.i9 = 0.0;

        // Ventilatory response to hypoxia
        v.o2vtst = ((v.po2art - 67.0) / 30.0).min(1.0).max(0.6);
        v.o2vts2 = 1.0 / v.o2vtst;
        v.do2vad = ((v.o2vts2 - 1.0) * 3.0 - v.o2vad1) * 5e-4;
        v.o2vad1 += v.do2vad * v.i;
        v.o2vad2 = v.o2vad1 + 1.0;
    }

    pub fn stats(&self) -> Vec<SolverStats> {
        vec![self.arterial_po2.stats().clone()]
    }
}

/// Piecewise-linear inverse of the oxygen dissociation curve (mmHg).
fn arterial_po2(saturation: f64) -> f64 {
    if saturation > 1.0 {
        114.0 + (saturation - 1.0) * 6667.0
    } else if saturation > 0.936 {
        74.0 + (saturation - 0.936) * 625.0
    } else if saturation > 0.8 {
        46.0 + (saturation - 0.8) * 205.882
    } else {
        saturation * 57.5
    }
}
