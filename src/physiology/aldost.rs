//! Aldosterone secretion and its effects on sodium and potassium handling.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.amrbsc = ((v.anm - 1.0) * p.anmald + 1.0) * 0.909 * (v.cke - 3.3);
    v.amr = (v.amrbsc - 1.0) * p.amkmul + 1.0;
    if v.amr < 0.0 {
        v.amr = 0.0;
    }
    v.amr1 = v.amr + p.aldinf;
    if p.aldkns > 0.0 {
        v.amr1 = p.aldkns;
    }

    v.amc += (v.amr1 - v.amc) * (1.0 - 1.0 / 2.7183_f64.powf(v.i / p.amt));
    v.am1 = p.am1ul
        - (p.am1ul - 1.0) / ((p.am1ll - 1.0) / (p.am1ll - p.am1ul) * (v.amc - 1.0) * p.amcsns + 1.0);
    v.am = (v.am1 - 1.0) * p.aldmm + 1.0;

    v.amk = (v.am - 1.0) * p.amkm + 1.0;
    if v.amk < 0.2 {
        v.amk = 0.2;
    }
    v.amna = (v.am - 1.0) * p.amnam + 1.0;
    if v.amna < p.amnall {
        v.amna = p.amnall;
    }
    if v.amna > p.amnaul {
        v.amna = p.amnaul;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potassium_stimulates_aldosterone() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.cke = 6.0;
        v.i = 60.0;
        update(&p, &mut v);
        assert!(v.amc > 1.0, "amc = {}", v.amc);
        assert!(v.am > 1.0);
    }

    #[test]
    fn test_sodium_effect_is_bounded() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.cke = 30.0;
        v.i = 1e4;
        update(&p, &mut v);
        assert!(v.amna <= p.amnaul && v.amna >= p.amnall);
    }
}
