//! Circulatory dynamics.
//!
//! Advances the five vascular volumes by one micro-step (`i2`) and recomputes
//! pressures, resistances and flows around the circulation. This is the fast
//! subsystem; it runs once per equilibrator micro-step, not once per slow step.

use crate::config::Parameters;
use crate::integrator::lookup;
use crate::state::Variables;

/// Left ventricular pumping effectiveness vs. normalized arterial pressure.
const LV_PRESSURE_EFFECT: [f64; 12] = [
    0.0, 1.04, 60.0, 1.025, 125.0, 0.97, 160.0, 0.88, 200.0, 0.59, 240.0, 0.0,
];
/// Right ventricular output vs. effective right atrial pressure.
const RV_FILLING: [f64; 10] = [-8.0, 0.0, -6.0, 0.75, -2.0, 2.6, 4.0, 9.8, 12.0, 13.5];
/// Right ventricular effectiveness vs. normalized pulmonary arterial pressure.
const RV_PRESSURE_EFFECT: [f64; 12] = [
    0.0, 1.06, 32.0, 0.97, 38.4, 0.93, 48.0, 0.8, 60.8, 0.46, 72.0, 0.0,
];
/// Left ventricular output vs. effective left atrial pressure.
const LV_FILLING: [f64; 10] = [-2.0, 0.01, 1.0, 3.6, 5.0, 9.4, 8.0, 11.6, 12.0, 13.5];

pub fn update(p: &Parameters, v: &mut Variables) {
    // Volume redistribution
    v.vbd = v.vp + v.vrc - v.vvs - v.vas - v.vla - v.vpa - v.vra;
    v.vvs += v.dvs * p.i2 + v.vbd * 0.3986;
    v.vpa += v.dpa * p.i2 + v.vbd * 0.155;
    v.vas += v.das * p.i2 + v.vbd * 0.261;
    v.vla += v.dla * p.i2 + v.vbd * 0.128;
    v.vra += v.dra * p.i2 + v.vbd * 0.0574;

    // Systemic arteries
    v.vae = v.vas - 0.495;
    v.pa3 = v.pa;
    v.pa = v.vae / 0.00155;
    v.pam = (v.pa / 100.0).powf(p.paex);

    v.myogrs = 1.0;
    if p.tensgn > 0.0 {
        v.tens1 = (v.pa + v.pc) / 117.0 * v.pam.powf(0.25);
        v.tens2 = (v.tens1 - 1.0) / (p.tensgn + 1.0) + 1.0;
        v.tens = v.tens1 * v.rad;
        v.rad += (v.tens2 - v.tens) / p.tenstc * p.i2;
        v.myogrs = (1.0 / v.rad).powf(4.0);
    }

    // Korner's renal pressure adaptation
    v.pamkrn = 1.0;
    if v.korner > 0.0 {
        v.pamk += ((v.pa / 100.0 - 1.0) * p.korgn + 1.0 - v.pamk) / p.kortc * v.i;
        if v.korren > 0.0 {
            v.pamkrn = v.pamk;
        }
    }

    v.pa2 = v.pa / v.auh / v.osa;
    v.lvm = lookup(v.pa2, &LV_PRESSURE_EFFECT, v.lvm);

    // Right atrium
    v.vre = v.vra - 0.1;
    v.pra = v.vre / 0.005;
    v.pra1 = (v.pra + 8.0) * (p.htauml * (v.au - 1.0) + 1.0) - 8.0;
    v.qrn = lookup(v.pra1, &RV_FILLING, v.qrn);

    // Pulmonary circulation
    v.vpe = v.vpa - 0.30625;
    v.ppa = v.vpe / 0.0048;
    v.pp1 = 0.026 * v.ppa;
    if v.pp1 < 1e-5 {
        v.pp1 = 1e-5;
    }
    v.cpa = v.pp1.sqrt();
    v.rpa = 1.0 / v.cpa;
    v.pp2 = v.ppa / v.auh / v.osa;
    v.rvm = lookup(v.pp2, &RV_PRESSURE_EFFECT, v.rvm);

    // Left atrium
    v.vle = v.vla - 0.38;
    v.pla = v.vle / 0.01;
    v.pla1 = (v.pla + 4.0) * (p.htauml * (v.au - 1.0) + 1.0) - 4.0;
    v.qln = lookup(v.pla1, &LV_FILLING, v.qln);
    v.pl1 = v.pla + 18.0;
    v.rpv = 1.0 / v.pl1 / 0.0357;
    v.rpt = v.rpv + v.rpa;
    v.pgl = v.ppa - v.pla;
    v.qpo = v.pgl / v.rpt;

    // Systemic veins
    v.vve = v.vvs - v.vvr - (v.anu - 1.0) * p.any - v.vv7 - v.vv6 - v.atrvfb;
    v.pvs = 3.7 + (v.vve - 0.74) / p.cv;
    if v.pvs < 1e-4 {
        v.pvs = 1e-4;
    }
    v.pr1 = v.pra;
    if v.pra < p.pr1ll {
        v.pr1 = p.pr1ll;
    }
    v.pgv = v.pvs - v.pr1;
    v.rvg = 0.74 / (v.pvs / v.vim / 3.7).sqrt();
    v.qvo = v.pgv / v.rvg;

    // Systemic resistances
    v.cn3 += (((v.pc - 17.0) * p.cn7 + 17.0) * p.cn2 - v.cn3) * 0.1;
    v.rv1 = p.rvsm / v.cn3;
    v.rvs = v.ave * v.rv1 * v.vim * v.anuvn;
    v.pgs = v.pa - v.pvs;
    v.r1 = v.anu * v.adhmv * v.aum * v.vim * v.pamk / v.pam / v.atrrfb;
    v.rsn = p.rar * v.arm * v.r1 * v.myogrs * v.rmult1 + v.rvs * 1.79;
    v.bfn = v.pgs / v.rsn;
    v.rsm = v.amm * v.ram * v.r1 * v.myogrs * v.rmult1;
    v.bfm = v.pgs / v.rsm;
    v.fisflo = (v.pa - v.pra) * p.fis;
    v.sysflo = v.bfm + v.bfn + v.rbf;
    v.qao = v.sysflo + v.fisflo;

    // Cardiac outputs
    v.qlo = v.lvm * v.qln * v.auh * p.hsl * v.hmd * v.hpl;
    v.qlo1 = (v.pla - v.pa) / 3.0;
    if v.qlo1 > 0.0 {
        v.qlo += v.qlo1;
    }
    v.hpef = (1.0 - p.qrf) * v.auh * v.rvm * p.hsr * v.hmd * v.hpr + p.qrf * v.qlo / v.qln;
    v.qro = v.qrn * v.hpef;
    v.qpo = v.qlo + (v.qpo - v.qlo) / p.u;
    v.qvo = v.qro + (v.qvo - v.qro) / p.x;

    // Volume derivatives for the next micro-step
    v.dvs = v.qao - v.qvo;
    v.dpa = v.qro - v.qpo;
    v.das = v.qlo - v.qao;
    v.dla = v.qpo - v.qlo;
    v.dra = v.qvo - v.qro;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_state_is_near_balanced() {
        let p = Parameters::default();
        let mut v = Variables::default();
        update(&p, &mut v);

        assert!((v.pa - 100.0).abs() < 0.5, "pa = {}", v.pa);
        assert!((v.qao - v.qlo).abs() < 0.2, "qao = {}, qlo = {}", v.qao, v.qlo);
        assert_eq!(v.pa3, 100.0);
    }

    #[test]
    fn test_pulmonary_pressure_floor() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.vpa = 0.2;
        update(&p, &mut v);
        assert_eq!(v.pp1, 1e-5);
        assert!(v.rpa.is_finite());
    }
}
