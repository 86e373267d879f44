//! Derived circulation variables that feed nothing else.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(_p: &Parameters, v: &mut Variables) {
    v.pmc = (v.vae + v.vve + v.vre + v.vpe + v.vle) / 0.11;
    v.pms = (v.vae + v.vve + v.vre) / 0.09375;
    v.pmp = (v.vpe + v.vle) / 0.01625;
    v.hr = (72.0 * v.aur + v.pr1.powf(0.5) * 5.0) * ((v.hmd - 1.0) * 0.5 + 1.0);
    v.rtp = (v.pa - v.pra) / v.qao;
    v.svo = v.qlo / v.hr;
}
