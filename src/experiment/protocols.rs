//! Built-in experiment protocols that run every slow step after the
//! electrolyte module.

use crate::config::Parameters;
use crate::state::Variables;

/// Rapid autoregulation: with `autoC > 0`, pressure stretch, autonomic
/// feedback and local autoregulation are switched off and arterial
/// resistance follows total systemic flow instead.
pub fn rapid_regulation(p: &mut Parameters, v: &mut Variables) {
    if v.autoC <= 0.0 {
        return;
    }
    p.z = 1.0;
    p.sta = 1.0;
    p.paex = 0.0;

    p.poz = 0.0;
    p.pon = 0.0;
    p.pok = 0.0;
    p.pom = 0.0;
    p.pom2 = 0.0;

    v.rmult = ((v.bfn + v.bfm) / 3.8 - 1.0) * p.autogn + 1.0;
    v.rmult1 += (v.rmult - v.rmult1) * p.autok;
}

/// Whole-blood transfusion of `trnsfs` per minute at hematocrit `hmtrns`,
/// running for `timetr` minutes.
pub fn transfuse(p: &mut Parameters, v: &mut Variables) {
    if p.timetr <= 0.0 {
        return;
    }
    let pcnt = 0.01 * v.i;
    let plasma = p.trnsfs * pcnt * (100.0 - p.hmtrns);
    let cells = p.trnsfs * pcnt * p.hmtrns;

    v.vic += cells;
    v.vrc += cells;
    v.vp += plasma;
    v.nae += plasma * v.cna;
    v.ke += plasma * v.cke;
    v.ki += cells * v.cki;
    v.prp += plasma * v.cpp;

    v.trnstm += v.i;
    if v.trnstm > p.timetr {
        v.trnstm = 0.0;
        p.timetr = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapid_regulation_inactive_by_default() {
        let mut p = Parameters::default();
        let mut v = Variables::default();
        let (p0, v0) = (p.clone(), v.clone());
        rapid_regulation(&mut p, &mut v);
        assert_eq!(p, p0);
        assert_eq!(v, v0);
    }

    #[test]
    fn test_rapid_regulation_tracks_flow() {
        let mut p = Parameters::default();
        let mut v = Variables::default();
        v.autoC = 1.0;
        v.bfn = 3.8;
        v.bfm = 3.8;
        rapid_regulation(&mut p, &mut v);

        assert_eq!(p.sta, 1.0);
        assert_eq!(p.poz, 0.0);
        assert_eq!(v.rmult, p.autogn + 1.0);
        assert!((v.rmult1 - (1.0 + p.autogn * p.autok)).abs() < 1e-12);
    }

    #[test]
    fn test_transfusion_adds_volume_then_stops() {
        let mut p = Parameters::default();
        p.timetr = 1.0;
        p.trnsfs = 0.01;
        let mut v = Variables::default();
        v.i = 0.6;
        let vp = v.vp;

        transfuse(&mut p, &mut v);
        assert!(v.vp > vp);
        assert_eq!(p.timetr, 1.0);

        transfuse(&mut p, &mut v);
        assert_eq!(p.timetr, 0.0);
        assert_eq!(v.trnstm, 0.0);

        let after = v.vp;
        transfuse(&mut p, &mut v);
        assert_eq!(v.vp, after);
    }
}
