//! Thirst and drinking.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.anmsml = (v.anm - 1.0) * p.anmslt + 1.0;
    v.sth = (p.z10 - v.pot).powf(2.0) * p.z11 * v.anmsml;
    if v.sth < 0.8 {
        v.sth = 0.8;
    }
    if v.sth > 8.0 {
        v.sth = 8.0;
    }

    v.ahth = ((v.adhc - 1.0) * p.ahthm + 1.0) * v.sth * 0.001;
    if v.ahth < 0.0 {
        v.ahth = 0.0;
    }
    v.anmth = (v.anm - 1.0) * p.anmtm * 0.001;
    v.tvz = v.anmth + v.ahth;
    if v.tvz < 0.0 {
        v.tvz = 0.0;
    }
    v.tvd += (v.tvz + p.dr - v.tvd) / p.tvddl * v.i;
}
