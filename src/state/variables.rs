//! Time-evolving model variables.
//!
//! Field names follow the Guyton 1992 mnemonics so that parameter files,
//! experiment definitions and instrument output lists can refer to them
//! directly. Unlisted initial values are zero.

use crate::state::registry::named_scalars;

named_scalars! {
    /// Every state variable of the model, with its reference initial value.
    pub struct Variables {
        /// Simulation time (min)
        t = 0.0,
        /// Current slow step size (min)
        i = 0.003,
        /// NaCl concentration entering the thick ascending limb (mM)
        Calh = 0.0,
        /// NaCl concentration at the macula densa (mM)
        Ci = 0.0,
        /// Single-nephron filtration rate (nl/min)
        GFR = 0.0,
        /// Single-nephron arterial pressure (mmHg)
        Pas = 0.0,
        /// Glomerular pressure at the capillary entrance (mmHg)
        Pg0 = 0.0,
        /// Flow into the thick ascending limb (nl/min)
        Qalh = 0.0,
        /// Single-nephron afferent resistance
        Ra = 0.0,
        a1b = 0.0,
        /// Afferent arteriolar resistance (mmHg min/L)
        aar = 40.0,
        adh = 1.0,
        /// ADH concentration (normal = 1)
        adhc = 1.0,
        adhmk = 1.0,
        adhmv = 1.0,
        adhna = 0.0,
        adhpa = 0.0,
        adhpr = 0.0,
        adhz = 0.0,
        ah7 = 0.0,
        ahth = 0.0,
        ahy = 0.0,
        ahz = 0.0,
        alvent = 0.0,
        /// Aldosterone multiplier (normal = 1)
        am = 1.0,
        am1 = 1.0,
        amc = 1.0,
        amk = 1.0,
        amk1 = 1.0,
        amm = 1.0,
        amm1 = 1.0,
        amm2 = 1.0,
        amm3 = 0.0,
        amna = 1.0,
        amr = 1.0,
        amr1 = 1.0,
        amrbsc = 0.0,
        anc = 1.0,
        angscr = 1.0,
        /// Angiotensin multiplier (normal = 1)
        anm = 1.0,
        anmar = 1.0,
        anmer = 1.0,
        anmke = 1.0,
        anmsml = 0.0,
        anmth = 0.0,
        anp = 1.0,
        anp1 = 1.0,
        anpc = 1.0,
        anpinf = 0.0,
        anpkns = 0.0,
        anpl = 0.0,
        anpr = 0.0,
        anpr1 = 0.0,
        anpr2 = 0.0,
        /// ANP effect on afferent resistance
        anpx = 1.0,
        anu = 1.0,
        anuvn = 1.0,
        anx = 0.0,
        anx1 = 0.0,
        aom = 1.0,
        apd = 0.0,
        ar1 = 1.0,
        ar2 = 1.0,
        ar3 = 1.0,
        ar4 = 0.0,
        ar5 = 0.0,
        arm = 1.0,
        atrfbm = 0.0,
        atrrfb = 1.0,
        atrvfb = 0.0,
        atrvm = 0.0,
        /// Overall autonomic drive (normal = 1)
        au = 1.0,
        au1 = 1.0,
        au2 = 0.0,
        au4 = 0.0,
        au6 = 1.0,
        au6a = 1.0,
        au6b = 0.0,
        au6c = 0.0,
        au8 = 0.0,
        aub = 1.0,
        auc = 0.0,
        auc2 = 0.0,
        auh = 1.0,
        aulp = 1.0,
        aum = 1.0,
        aumk = 1.0,
        aun = 0.0,
        auo = 0.0,
        aur = 1.0,
        aurg = 1.0,
        /// Enables the rapid autoregulation protocol when > 0
        autoC = 0.0,
        auttl = 1.0,
        auy = 0.15,
        ave = 1.0,
        bfm = 1.07,
        bfn = 2.73,
        ccd = 0.0,
        chy = 1.0,
        /// Extracellular potassium concentration (mEq/L)
        cke = 4.4,
        cki = 142.0,
        cn3 = 1.0,
        /// Extracellular sodium concentration (mEq/L)
        cna = 142.0,
        cpa = 0.0,
        cpi = 24.0,
        cpn = 0.0,
        /// Plasma protein concentration (g/L)
        cpp = 70.0,
        cppd = 0.0,
        crrflx = 0.0,
        /// Myogenic resistance change from TGF interaction
        dRma = 0.0,
        /// Myogenic resistance change from pressure
        dRmd = 0.0,
        /// Tubuloglomerular feedback resistance change
        dRtgf = 0.0,
        das = 0.0,
        dau = 0.0,
        dfp = 0.0,
        dfz = 0.0,
        dhm = 0.0,
        dla = 0.0,
        dlp = 0.0,
        do2m = 0.0,
        do2n = 0.0,
        do2vad = 0.0,
        dob = 160.0,
        dova = 0.0,
        dpa = 0.0,
        dpc = 0.0,
        dpi = 0.0,
        dpl = 0.0,
        dpp = 0.0,
        dra = 0.0,
        dtka = 0.0333,
        dtki = 0.0,
        dtksc = 0.0,
        dtnai = 0.0,
        dtnang = 0.0,
        dtnara = 0.0,
        dturi = 0.2524,
        dvs = 0.0,
        /// Efferent arteriolar resistance (mmHg min/L)
        ear = 43.333,
        efafpr = 0.0,
        fisflo = 0.0,
        gbl = 0.0,
        /// Glomerular filtration rate of the normal kidney mass (L/min)
        gfn = 0.125,
        /// Glomerular filtration rate (L/min)
        gfr = 0.125,
        glp = 0.0,
        glpc = 32.9,
        glpca = 0.0,
        hkm = 0.5333,
        /// Hematocrit (%)
        hm = 40.0,
        /// Hematocrit fraction
        hm1 = 0.4,
        hm3 = 0.0,
        hm4 = 0.0,
        hm5 = 0.0,
        hm7 = 0.0,
        hmd = 1.0,
        hpef = 0.0,
        hpl = 1.0,
        hpr = 1.0,
        /// Heart rate (beats/min)
        hr = 0.0,
        /// Stiffness bound on the slow step from plasma volume change (min)
        i1 = 0.0,
        i11 = 0.0,
        i13 = 0.0,
        i15 = 0.0,
        i17 = 0.0,
        i19 = 0.0,
        i21 = 0.0,
        /// Elapsed micro-time in the fast equilibrator (min)
        i5 = 0.0,
        i9 = 0.0,
        ke = 66.0,
        ki = 3550.0,
        /// Potassium excretion (mEq/min)
        kod = 0.0738,
        kodn = 0.0738,
        korner = 0.0,
        korren = 0.0,
        /// Total body potassium (mEq)
        ktot = 3616.0,
        ktotd = 0.0,
        lvm = 1.0,
        mdflk = 0.0,
        /// Normalized macula densa flow
        mdflw = 1.0,
        mdflw1 = 0.0,
        mdflw3 = 1.0,
        mmo = 60.0,
        mo2 = 160.0,
        myogrs = 1.0,
        /// Extracellular sodium (mEq)
        nae = 2130.0,
        ned = 0.0,
        /// Sodium excretion (mEq/min)
        nod = 0.1,
        nodn = 0.1,
        o2dfs = 0.0,
        o2util = 220.0,
        o2vad1 = 0.2,
        o2vad2 = 1.2,
        o2vts2 = 1.07,
        o2vtst = 0.93,
        /// Arterial oxygen saturation (fraction)
        osa = 0.97,
        osmop1 = 0.0,
        osmopn = 0.0,
        osv = 0.68,
        ova = 203.7,
        ovs = 0.7,
        p1o = 35.0,
        p2o = 38.0,
        /// Mean arterial pressure (mmHg)
        pa = 100.0,
        pa1 = 100.0,
        pa2 = 0.0,
        /// Arterial pressure at the previous micro-step (mmHg)
        pa3 = 0.0,
        pam = 1.0,
        pamk = 1.0,
        pamkrn = 1.0,
        /// Renal perfusion pressure (mmHg)
        par = 0.0,
        /// Capillary pressure (mmHg)
        pc = 17.0,
        pcp = 0.0,
        pdo = 0.0,
        pfi = 0.0,
        pfl = 0.0,
        pgh = -4.3,
        pgl = 0.0,
        pgs = 0.0,
        pgv = 0.0,
        pif = -6.3,
        pl1 = 0.0,
        /// Left atrial pressure (mmHg)
        pla = 2.0,
        pla1 = 0.0,
        pld = 0.1,
        plf = 0.0,
        plur = 168.0,
        plurc = 4.2,
        pmc = 0.0,
        pmo = 38.0,
        pmp = 0.0,
        pms = 0.0,
        po2alv = 110.0,
        po2am1 = 0.0,
        po2amb = 150.0,
        po2ar1 = 0.0,
        /// Arterial PO2 (mmHg)
        po2art = 95.0,
        poa = 0.0,
        pob = 0.0,
        poc = 0.0,
        pod = 0.0,
        poe = 0.0,
        pos = 0.0,
        poshyl = 2.0,
        pot = 35.0,
        pov = 39.0,
        pp1 = 0.0,
        pp2 = 0.0,
        /// Pulmonary arterial pressure (mmHg)
        ppa = 16.0,
        ppc = 28.9,
        ppd = 0.0,
        ppi = 0.0,
        ppn = 0.0,
        ppo = 0.0,
        ppr = 0.375,
        ppz = 0.0,
        pr1 = 0.0,
        /// Right atrial pressure (mmHg)
        pra = 0.0,
        pra1 = 0.0,
        prcd = 0.0,
        /// Total plasma protein (g)
        prp = 210.0,
        ptc = 6.2,
        ptcpr = 7.8,
        ptfl = 0.0,
        pts = 0.0,
        ptt = 0.0,
        pvo = 40.0,
        /// Mean systemic venous pressure (mmHg)
        pvs = 3.7,
        /// Aortic flow, i.e. cardiac output (L/min)
        qao = 5.0,
        qln = 5.0,
        /// Left ventricular output (L/min)
        qlo = 5.0,
        qlo1 = 0.0,
        qo2 = 72.0,
        qom = 48.1,
        /// Pulmonary venous flow (L/min)
        qpo = 5.0,
        qrn = 5.0,
        /// Right ventricular output (L/min)
        qro = 5.0,
        /// Venous return (L/min)
        qvo = 5.0,
        r1 = 0.0,
        rabspr = 0.0,
        rad = 1.0,
        ram = 90.0,
        /// Renal blood flow (L/min)
        rbf = 1.2,
        rc1 = 0.0,
        rc2 = 0.0,
        rcd = 0.0,
        rcprs = 0.0,
        rfab = 1.0,
        rfab1 = 0.0,
        rfabd = 1.0,
        rfabk = 0.0,
        rfabx = 0.0,
        rfcdft = 0.0,
        rfn = 1.2,
        rmo = 60.0,
        rmult = 1.0,
        rmult1 = 1.0,
        rnaug1 = 1.0,
        rnaug2 = 1.0,
        rnaug3 = 0.0,
        rnaull = 0.3,
        rnauul = 10.0,
        rpa = 0.0,
        rps = 0.0,
        rpt = 0.0,
        rpv = 0.0,
        rr = 83.333,
        rsm = 0.0,
        rsn = 0.0,
        rspdfc = 0.0,
        rtp = 0.0,
        rtsppc = 0.0,
        rv1 = 0.0,
        rvg = 0.0,
        rvm = 0.0,
        rvs = 3.2,
        sth = 1.0,
        svo = 0.0,
        sysflo = 0.0,
        tens = 0.0,
        tens1 = 0.0,
        tens2 = 0.0,
        /// Elapsed transfusion time (min)
        trnstm = 0.0,
        trrbc = 0.0,
        tsp = 288.0,
        tvd = 0.001,
        tvz = 0.0,
        urod = 0.2524,
        vae = 0.0,
        vas = 0.65,
        /// Blood volume (L)
        vb = 5.0,
        vbd = 0.0,
        /// Extracellular fluid volume (L)
        vec = 15.0,
        vg = 0.0,
        vib = 0.0,
        /// Intracellular fluid volume (L)
        vic = 25.0,
        vid = 0.0,
        vie = 0.0,
        vif = 0.0,
        vim = 1.0,
        vla = 0.4,
        vle = 0.0,
        /// Plasma volume (L)
        vp = 3.0,
        vpa = 0.385,
        /// Rate of change of plasma volume (L/min)
        vpd = 0.0,
        vpe = 0.0,
        vpf = 0.0125,
        vra = 0.1,
        /// Red cell volume (L)
        vrc = 2.0,
        vre = 0.0,
        vtc = 0.0,
        vtcpl = 0.0,
        vtl = 0.002,
        /// Interstitial fluid volume (L)
        vts = 12.0,
        vts1 = 12.0,
        vts2 = 0.0,
        /// Total body water (L)
        vtw = 40.0,
        /// Urine volume (L/min)
        vud = 0.001,
        vud1 = 0.0,
        vud2 = 1e-06,
        vudn = 0.001,
        vv6 = 0.0,
        vv7 = 0.0,
        vve = 0.74,
        vvr = 2.73,
        vvs = 3.465,
    }
}

impl Variables {
    /// True when every variable is a finite number.
    pub fn all_finite(&self) -> bool {
        use crate::state::registry::NamedScalars;
        Self::accessors().iter().all(|a| (a.get)(self).is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_initial_state() {
        let v = Variables::default();
        assert_eq!(v.t, 0.0);
        assert_eq!(v.i, 0.003);
        assert_eq!(v.pa, 100.0);
        assert_eq!(v.cna, 142.0);
        assert!(v.all_finite());
    }

    #[test]
    fn test_hematocrit_consistent_with_volumes() {
        let v = Variables::default();
        let hm1 = v.vrc / (v.vp + v.vrc);
        assert!((hm1 - v.hm1).abs() < 1e-12, "hm1 = {}", hm1);
    }
}
