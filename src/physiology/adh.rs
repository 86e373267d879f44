//! Antidiuretic hormone.
//!
//! Secretion responds to plasma sodium and to arterial pressure below
//! `adhpul`. The circulating level sets the renal (`adhmk`) and vascular
//! (`adhmv`) multipliers.

use crate::config::Parameters;
use crate::state::Variables;

pub fn update(p: &Parameters, v: &mut Variables) {
    v.adhna = (v.cna - p.cnr) / (142.0 - p.cnr);
    if v.adhna < 0.0 {
        v.adhna = 0.0;
    }
    v.adhpa = if v.pa1 > p.adhpul { p.adhpul } else { v.pa1 };
    v.adhpr = (p.adhpul - v.adhpa).powf(2.0) * p.adhpam;
    v.adh = v.adhna + v.adhpr + p.adhinf;
    if v.adh < 0.0 {
        v.adh = 0.0;
    }

    v.adhc += (v.adh - v.adhc) * (1.0 - 1.0 / 2.7183_f64.powf(v.i / p.adhtc / p.z16));

    v.adhz = p.adhkll - p.adhkul;
    v.adhmk = p.adhkul - (p.adhkul - 1.0) / ((p.adhkll - 1.0) / v.adhz * (v.adhc - 1.0) + 1.0);
    if v.adhmk < p.adhkll {
        v.adhmk = p.adhkll;
    }

    v.adhz = p.adhvll - p.adhvul;
    v.adhmv = p.adhvul - (p.adhvul - 1.0) / ((p.adhvll - 1.0) / v.adhz * (v.adhc - 1.0) + 1.0);
    if v.adhmv < p.adhvll {
        v.adhmv = p.adhvll;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hypernatremia_raises_adh() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.pa1 = 100.0;
        v.cna = 148.0;
        v.i = 30.0;
        update(&p, &mut v);
        assert!(v.adh > 1.0);
        assert!(v.adhc > 1.0);
        assert!(v.adhmk > 1.0);
    }

    #[test]
    fn test_multipliers_respect_lower_limits() {
        let p = Parameters::default();
        let mut v = Variables::default();
        v.pa1 = 100.0;
        v.cna = 100.0;
        v.i = 1e4;
        update(&p, &mut v);
        assert!(v.adhmk >= p.adhkll);
        assert!(v.adhmv >= p.adhvll);
    }
}
