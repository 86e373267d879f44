//! Atrial volume receptors.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.ahz = v.pra.abs().powf(p.ah10);
    if v.pra <= 0.0 {
        v.ahz = -v.ahz;
    }
    v.ahz *= p.ah9;
    v.ahy += (v.ahz - v.ahy) / p.ah11 * v.i;
    v.ah7 = v.ahz - v.ahy;
    v.atrrfb = v.ah7 * v.atrfbm + 1.0;
    v.atrvfb = v.ah7 * v.atrvm;
}
