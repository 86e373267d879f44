//! Pulmonary fluid dynamics and heart hypertrophy.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.pcp = (v.ppa - v.pla) * v.rpv / (v.rpv + v.rpa) + v.pla;
    v.ppi = 2.0 - 0.15 / v.vpf;
    v.cpn = v.ppr / v.vpf;
    v.pos = v.cpn * 0.4;
    v.plf = (v.ppi + 11.0) * 0.0003;

    // Pulmonary interstitial protein
    v.ppo = v.plf * v.cpn;
    v.ppn = (v.cpp - v.cpn) * 0.000225;
    v.ppz = v.ppn - v.ppo;
    v.ppd += (v.ppz - v.ppd) / p.z18;
    if v.ppr + v.ppd * v.i - 0.025 < 0.0 {
        v.ppd = (0.025 - v.ppr) / v.i;
    }

    // Pulmonary interstitial fluid
    v.pfi = (v.pcp - v.ppi + v.pos - v.ppc) * p.cpf;
    v.dfz = v.pfi - v.plf;
    v.dfp += (v.dfz - v.dfp) / p.z19;
    if v.vpf + v.dfp * v.i - 0.001 < 0.0 {
        v.dfp = (0.001 - v.vpf) / v.i;
    }
    v.vpf += v.dfp * v.i;
    v.ppr += v.ppd * v.i;

    // Hypertrophy
    v.hpl += ((v.pa * v.qao / 500.0 / p.hsl).powf(p.z13) - v.hpl) * v.i / 57600.0;
    v.hpr += ((v.ppa * v.qao / 75.0 / p.hsr).powf(p.z13) - v.hpr) * v.i / 57600.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulmonary_fluid_floor() {
        let p = Parameters::default();
        let mut v = Variables::default();
        crate::physiology::circdyn::update(&p, &mut v);
        v.vpf = 0.0011;
        v.dfp = -1.0;
        v.i = 1.0;
        update(&p, &mut v);
        assert!(v.vpf >= 0.001 - 1e-15, "vpf = {}", v.vpf);
    }
}
