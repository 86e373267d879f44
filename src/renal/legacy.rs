//! Whole-kidney renal model of the Guyton 1992 circulation.
//!
//! Afferent/efferent resistances are autoregulated by macula densa flow,
//! glomerular filtration follows from the resulting pressures, and a second
//! loop settles urine volume against osmolar and ADH-controlled water
//! reabsorption.

use crate::config::Parameters;
use crate::integrator::{EquilibriumSolver, SolverStats};
use crate::renal::RenalModel;
use crate::state::Variables;

/// Sub-iteration time allowed to the urinary excretion loop (min).
const URINE_BUDGET: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct LegacyRenal {
    autoregulation: EquilibriumSolver,
    urine: EquilibriumSolver,
}

impl Default for LegacyRenal {
    fn default() -> Self {
        Self {
            autoregulation: EquilibriumSolver::new("renal_autoregulation"),
            urine: EquilibriumSolver::new("urinary_excretion"),
        }
    }
}

impl RenalModel for LegacyRenal {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn update(&mut self, p: &Parameters, v: &mut Variables) {
        renal_perfusion_pressure(p, v);
        v.aumk = (v.aum - 1.0) * p.arf + 1.0;
        if v.aumk < 0.8 {
            v.aumk = 0.8;
        }
        v.anmer = (v.anm - 1.0) * p.anmem + 1.0;
        v.anmar = (v.anm - 1.0) * p.anmam + 1.0;
        if v.anmar < p.anmarl {
            v.anmar = p.anmarl;
        }

        let budget = v.i;
        self.autoregulation
            .iterate(budget, p.i4, p.mdflw2, || autoregulate(p, v));
        v.i5 = 0.0;

        tubular_reabsorption(p, v);

        let tol = v.vud2;
        self.urine
            .iterate(URINE_BUDGET, p.i6, tol, || urine_volume(p, v));

        v.vud = v.vudn * p.rek;
        v.nod = v.nodn * p.rek;
        v.kod = v.kodn * p.rek;

        // Urea
        v.plur += (p.urform - v.urod) * v.i;
        v.plurc = v.plur / v.vtw;
        v.dturi = v.gfn.powf(2.0) * v.plurc * 3.84;
        v.urod = v.dturi * p.rek;
    }

    fn stats(&self) -> Vec<SolverStats> {
        vec![self.autoregulation.stats().clone(), self.urine.stats().clone()]
    }
}

/// Renal perfusion pressure, optionally servo-controlled or drifting toward
/// a shifted set point.
fn renal_perfusion_pressure(p: &Parameters, v: &mut Variables) {
    v.par = if p.raprsp > 0.0 { p.raprsp } else { v.pa - v.gbl };
    if v.rfcdft > 0.0 {
        v.par += ((100.0 + (v.pa - 100.0) * p.rcdfpc) - v.par) / p.rcdfdp * v.i;
    }
}

/// One pass of the afferent/efferent autoregulation loop. Returns the change
/// in macula densa flow.
fn autoregulate(p: &Parameters, v: &mut Variables) -> f64 {
    v.rnaug1 += (((v.mdflw - 1.0) * p.rnaugn + 1.0) - v.rnaug1) / p.rnagtc;
    if v.rnaug1 < v.rnaull {
        v.rnaug1 = v.rnaull;
    }
    if v.rnaug1 > v.rnauul {
        v.rnaug1 = v.rnauul;
    }
    v.rnaug2 = v.rnaug1 - v.rnaug3;
    v.rnaug3 += (v.rnaug2 - 1.0) * p.rnauad * p.i4;

    let aar1 = p.aark * v.pamkrn * v.aumk * v.rnaug2 * v.anmar * 40.0 * v.myogrs;
    v.aar = aar1 - v.anpx * p.anpxaf + p.anpxaf;
    if v.aar < p.aarll {
        v.aar = p.aarll;
    }
    v.ear = 43.333 * p.eark * v.anmer * ((v.rnaug2 - 1.0) * p.efafr + 1.0) * v.myogrs;
    v.ear *= (v.aumk - 1.0) * p.aumk1 + 1.0;
    if v.ear < p.earll {
        v.ear = p.earll;
    }
    v.rr = v.aar + v.ear;
    v.rfn = v.par / v.rr;

    // Glomerular colloid osmotic pressure
    if v.glpca > 0.0 {
        let plasma_flow = v.rfn * v.vp / v.vb;
        v.efafpr = plasma_flow / (plasma_flow - v.gfn);
        if v.efafpr < 1.0 {
            v.efafpr = 1.0;
        }
        v.glpc += (v.efafpr.powf(1.35) * v.ppc * 0.98 - v.glpc) / p.gppd;
    } else {
        v.glpc = v.ppc + 4.0;
    }

    v.rbf = p.rek * v.rfn;
    v.apd = v.aar * v.rfn;
    v.glp = v.par - v.apd;
    v.pfl = v.glp - v.glpc - p.pxtp;
    v.gfn += (v.pfl * p.gflc - v.gfn) / p.gfndmp;
    if v.gfn < p.gfnll {
        v.gfn = p.gfnll;
    }
    v.gfr = v.gfn * p.rek;
    v.ptfl = v.gfn * 8.0;

    v.mdflw1 = v.mdflw;
    v.mdflw = (v.ptfl - 1.0) * p.mdfl1 + 1.0;
    if v.mdflw < 0.0 {
        v.mdflw = 0.0;
    }
    v.mdflw - v.mdflw1
}

/// Proximal and distal sodium and potassium handling.
fn tubular_reabsorption(p: &Parameters, v: &mut Variables) {
    v.rcprs = ((v.rfn - 1.2) * v.rfabx + 1.2) * p.rvrs;
    v.rtsppc = v.glpc * p.rtppr - p.rtpprs;
    if v.rtsppc < 1.0 {
        v.rtsppc = 1.0;
    }
    v.rabspr = v.glpc + p.rtsprs - v.rcprs - v.rtsppc;
    v.rfab1 = v.rabspr * p.rabsc;
    v.rfab += (v.rfab1 - v.rfab) / p.rfabdp;
    v.rfabd = (v.rfab - 1.0) * p.rfabdm + 1.0;
    if v.rfabd < 1e-4 {
        v.rfabd = 1e-4;
    }
    v.rfabk = (v.rfabd - 1.0) * p.rfabkm;

    v.dtnai = v.mdflw * v.cna * 0.0061619;
    v.dtnara = v.amna * v.rfabd * p.dtnar / p.diuret * ((v.adhmk - 1.0) * p.ahmnar + 1.0);
    if v.dtnara < p.dtnarl {
        v.dtnara = p.dtnarl;
    }
    v.dtnang = ((v.anm - 1.0) * p.anmnam + 1.0) * 0.1;
    if v.dtnang < 0.0 {
        v.dtnang = 0.0;
    }

    v.dtki = v.dtnai * v.cke / v.cna;
    v.anmke = (v.anm - 1.0) * p.anmkem + 1.0;
    if v.anmke < p.anmkel {
        v.anmke = p.anmkel;
    }
    v.mdflk = (v.mdflw - 1.0) * p.mdflkm + 1.0;
    if v.mdflk < 0.1 {
        v.mdflk = 0.1;
    }
    v.dtksc = (v.cke / 4.4).powf(p.ckeex) * v.amk * 0.08 * v.mdflk / v.anmke;
}

/// One pass of the urine volume loop. Returns the change in urine volume.
fn urine_volume(p: &Parameters, v: &mut Variables) -> f64 {
    v.nodn = v.dtnai - v.dtnara - v.dtnang;
    if v.nodn < 1e-8 {
        v.nodn = 1e-8;
    }
    v.dtka += (v.kodn / v.vudn * 0.0004518 - v.dtka) * p.i6;
    v.kodn = v.dtki + v.dtksc - v.dtka - v.rfabk;
    if v.kodn < 0.0 {
        v.kodn = 0.0;
    }

    v.osmopn = v.dturi + 2.0 * (v.nodn + v.kodn);
    v.osmop1 = v.osmopn - 0.6;
    if v.osmopn > 0.6 {
        v.osmopn = 0.6;
    }
    if v.osmop1 < 0.0 {
        v.osmop1 = 0.0;
    }
    v.vud1 = v.vudn;
    v.vudn = v.osmopn / 600.0 / v.adhmk + v.osmop1 / 360.0;
    v.vudn - v.vud1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_outputs_are_positive() {
        let p = Parameters::default();
        let mut v = Variables::default();
        crate::physiology::circdyn::update(&p, &mut v);
        let mut renal = LegacyRenal::default();
        renal.update(&p, &mut v);

        assert!(v.rbf > 0.5 && v.rbf < 2.5, "rbf = {}", v.rbf);
        assert!(v.nod > 0.0 && v.kod > 0.0 && v.vud > 0.0);
        assert_eq!(v.i5, 0.0);
        assert_eq!(renal.stats()[0].calls, 1);
    }

    #[test]
    fn test_servo_pressure_overrides_arterial_pressure() {
        let mut p = Parameters::default();
        p.raprsp = 80.0;
        let mut v = Variables::default();
        renal_perfusion_pressure(&p, &mut v);
        assert_eq!(v.par, 80.0);
    }

    #[test]
    fn test_low_pressure_reduces_sodium_excretion() {
        let p = Parameters::default();
        let mut normal = Variables::default();
        crate::physiology::circdyn::update(&p, &mut normal);
        let mut low = normal.clone();
        low.pa = 60.0;

        LegacyRenal::default().update(&p, &mut normal);
        LegacyRenal::default().update(&p, &mut low);
        assert!(low.rbf < normal.rbf);
        assert!(low.nod <= normal.nod);
    }
}
