//! Baroreceptor adaptation and heart deterioration.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.au2 = v.au6 - 1.0;
    v.au8 = p.auk * v.au2;
    v.au4 += v.au8 * v.i;

    v.dhm = (v.pot - 10.0) * p.dhdtr;
    v.hmd += v.dhm * v.i;
    if v.hmd > 1.0 {
        v.hmd = 1.0;
    }
}
