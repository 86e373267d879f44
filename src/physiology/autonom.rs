//! Autonomic control of the circulation.
//!
//! Chemoreceptor, baroreceptor and CNS ischemic drives combine into the
//! overall autonomic drive `au`, which scales heart strength, arterial and
//! venous resistance and unstressed venous volume. The stability check that
//! follows this module lives in the fast equilibrator.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    if p.sta - p.aumin > 0.0 {
        v.au = p.sta;
    } else {
        v.pa1 = v.pa - p.exe;
        if v.crrflx > 1e-7 {
            v.pa1 = v.crrflx;
        }

        // Chemoreceptors: pressure
        v.auc = 0.0;
        if v.pa1 < 80.0 {
            v.auc = 0.005 * (80.0 - v.pa1);
        }
        if v.pa1 < 40.0 {
            v.auc = 0.2;
        }
        v.auc *= p.auc1;

        // Chemoreceptors: arterial PO2
        v.auc2 = 0.0;
        if v.po2art <= 40.0 {
            v.auc2 = p.o2chmo * 40.0;
        } else if v.po2art <= 80.0 {
            v.auc2 = (80.0 - v.po2art) * p.o2chmo;
        }

        // Arterial baroreceptors
        v.aub = 0.0;
        if v.pa1 < 160.0 {
            v.aub = 0.016667 * (160.0 - v.pa1);
        }
        if v.pa1 < 80.0 {
            v.aub = 1.3336;
        }
        v.a1b = (v.aub - 1.0) * p.aux + 1.0;

        // CNS ischemic response
        v.aun = 0.0;
        if v.pa1 < 40.0 {
            v.aun = 0.04 * (40.0 - v.pa1);
        }
        v.aun *= p.aun1;

        // Baroreceptor adaptation and damping
        v.au6a = v.a1b - v.au4;
        v.au6b = v.au6;
        v.au6 = (v.au6a - v.au6) / p.barotc * v.i + v.au6;
        if v.i > 0.166666 {
            v.au6 = v.au6a;
        }
        v.au6c = v.au6 + (v.au6 - v.au6b) * p.mdmp;

        // Low-pressure receptors
        v.aulp = (15.0 / (v.pla + v.pra + v.ppa) - 1.0) * p.aulpm + 1.0;

        v.auttl = (v.aulp * (v.auc + v.auc2 + v.au6c + v.aun) * p.exc.powf(p.excxp) - 1.0)
            * p.excml
            + 1.0;
        if v.auttl < 0.0 {
            v.auttl = 0.0;
        }
        v.dau = v.auttl - v.au1;
        v.au1 += v.dau * p.i2 / p.audmp;
        v.au = p.aumax - (p.aumax - 1.0) / 2.7183_f64.powf(p.auslp * (v.au1 - 1.0));
        if v.au < p.aumin {
            v.au = p.aumin;
        }
    }

    // Effector multipliers
    v.auo = v.au - 1.0;
    v.auh = v.auo * p.auv + 1.0;
    v.aur = v.auo * p.aus + 1.0;
    v.vvr = p.vv9 - v.au * p.aul + p.aul;
    v.aum = (v.auo * p.aum1 + 1.0).powf(p.aum2);
    v.ave = v.auo * v.auy + 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_drive_overrides_reflexes() {
        let mut p = Parameters::default();
        p.sta = 2.0;
        let mut v = Variables::default();
        v.pa = 30.0;
        update(&p, &mut v);
        assert_eq!(v.au, 2.0);
        assert_eq!(v.auo, 1.0);
    }

    #[test]
    fn test_hypotension_raises_drive() {
        let p = Parameters::default();
        let mut normal = Variables::default();
        let mut low = Variables::default();
        low.pa = 60.0;
        for _ in 0..200 {
            update(&p, &mut normal);
            update(&p, &mut low);
        }
        assert!(low.au > normal.au, "low {} vs normal {}", low.au, normal.au);
    }

    #[test]
    fn test_drive_never_below_minimum() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.pa = 250.0;
        for _ in 0..1000 {
            update(&p, &mut v);
        }
        assert!(v.au >= p.aumin);
    }
}
