//! Stress relaxation of the venous reservoir.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.vv6 += ((v.vve - 0.74) * p.sr2 - v.vv6) / p.srk2 * v.i;
    v.vv7 += ((v.vve - 0.74) * p.sr - v.vv7) * (1.0 - 1.0 / 2.7183_f64.powf(v.i / p.srk));
}
