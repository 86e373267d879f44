//! Atrial natriuretic peptide.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.anpl = v.pla - 1.0;
    if v.anpl < 0.0 {
        v.anpl = 0.0;
    }
    v.anpr2 = (v.pra + 1.0) * 2.0;
    if v.anpr2 < 0.0 {
        v.anpr2 = 0.0;
    }
    v.anp = (v.anpl + v.anpr2) / 3.0;
    v.anp1 = v.anp + v.anpinf;
    if v.anpkns > 0.0 {
        v.anp1 = v.anpkns;
    }

    v.anpc += (v.anp1 - v.anpc) * (1.0 - 1.0 / 2.7183_f64.powf(v.i / p.anptc / p.z14));
    v.anpx = p.anpxul - p.anpxul / (0.5555556 * (1.0 + v.anpc));
    if v.anpx < -1.0 {
        v.anpx = -1.0;
    }
}
