//! Renin-angiotensin system.
//!
//! Renin secretion is driven by the smoothed macula densa flow signal from the
//! renal model; angiotensin then feeds back onto vascular resistance,
//! aldosterone, thirst and renal sodium reabsorption.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.mdflw3 += (v.mdflw - v.mdflw3) * p.mdflwx;
    if v.mdflw3 > 1.0 {
        v.angscr = 1.0 / (1.0 + (v.mdflw3 - 1.0) * 72.0);
    } else {
        v.angscr = 10.0 - 9.0 / (1.0 + (1.0 - v.mdflw3) * 8.0);
    }

    v.anx = (v.angscr - 1.0) * p.anxm;
    v.anx1 += (v.anx - v.anx1) / p.anv * v.i;

    v.anpr = (v.angscr + v.anx1) * p.rek;
    if v.anpr < 1e-5 {
        v.anpr = 1e-5;
    }
    v.anpr1 = v.anpr + p.anginf;
    if p.angkns > 0.0 {
        v.anpr1 = p.angkns;
    }

    v.anc += (v.anpr1 - v.anc) * (1.0 - 1.0 / 2.7183_f64.powf(v.i / p.ant / p.z12));
    v.anm = p.anmul
        - (p.anmul - 1.0) / ((p.anmll - 1.0) / (p.anmll - p.anmul) * (v.anc - 1.0) * p.ancsns + 1.0);

    v.anu = (v.anm - 1.0) * p.anum + 1.0;
    if v.anu < p.anull {
        v.anu = p.anull;
    }
    v.anuvn = (v.anu - 1.0) * p.anuvm + 1.0;
}
