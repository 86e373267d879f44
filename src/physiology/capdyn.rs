//! Capillary membrane dynamics, plasma protein and interstitial fluid.
//!
//! Computes the filtration balance across systemic capillaries, integrates
//! plasma volume and plasma protein, and resolves the interstitial gel and
//! free-fluid compartments including lymph flow.

use crate::config::Parameters;
use crate::integrator::lookup;
use crate::state::Variables;

/// Interstitial gel volume vs. total interstitial fluid volume (L).
const GEL_VOLUME: [f64; 12] = [
    0.0, 0.0, 12.0, 11.4, 15.0, 14.0, 18.0, 16.0, 21.0, 17.3, 24.0, 18.0,
];

pub fn update(p: &Parameters, v: &mut Variables) {
    // Capillary filtration and plasma volume
    v.pc = v.rvs * 1.7 * v.bfn + v.pvs;
    v.vtc = (v.pc - v.ppc - v.pgh + v.ptc) * p.cfc + v.vtcpl;
    v.vpd = v.vtl - v.vtc - v.dfp + p.trpl;
    v.vp += v.vpd * v.i;

    // Plasma protein
    v.cpp = v.prp / v.vp;
    v.cppd = v.cpp - p.cpr;
    if v.cppd < 0.0 {
        v.cppd = 0.0;
    }
    v.dlp = p.lppr - v.cppd.powf(p.lpde) * p.lpk;
    v.prcd = v.pc - p.pcr;
    if v.prcd < 0.0 {
        v.prcd = 0.0;
    }
    v.vtcpl = (v.prcd * p.cpk).powf(p.pce);
    v.dpc = v.vtcpl * v.cpp + (v.cpp - v.cpi) * 0.00104;
    v.dpp = v.dlp + v.dpl - v.dpc - v.ppd + p.trpl * 72.0;
    v.prp += v.dpp * v.i;
    v.ppc = 0.28 * v.cpp + 0.0019 * v.cpp.powf(2.0);

    // Interstitial fluid volume and protein
    v.vts = v.vec - v.vp - v.vpf;
    v.vts2 += ((v.vts - 12.0) * p.tsslml - v.vts2) * p.tssltc * v.i;
    v.vts1 = v.vts - v.vts2;
    v.dpi = v.dpc - v.dpl;
    v.tsp += v.dpi * v.i;
    v.cpi = v.tsp / v.vts;
    v.dpl = v.cpi * v.vtl;
    v.ptcpr = 0.28 * v.cpi + 0.0019 * v.cpi.powf(2.0);

    // Gel and free fluid pressures
    v.chy = (p.hyl / v.vts / 5.0).powf(p.cmptss);
    v.pgh = v.chy * p.pghf + v.ptt;
    v.poshyl = v.chy * 2.0;
    v.ptc = v.poshyl * v.ptcpr * p.gcopf;
    v.ptt = ((v.vts1 - p.vtsf) / p.vtsf).powf(2.0);
    v.pif = v.pgh - v.poshyl;
    v.pts = v.ptt - v.pif;

    // Lymph flow
    v.pld = v.pif + p.pldf - v.ptt;
    if v.pld > 7.0 {
        v.pld = 7.0;
    }
    v.vtl = v.pld * 0.02;
    if v.vtl < 0.0 {
        v.vtl = 0.0;
    }

    v.vg = lookup(v.vts, &GEL_VOLUME, v.vg);
    v.vif = v.vts - v.vg;
}
