//! Model parameters.
//!
//! Quasi-constant named scalars. Values are the published Guyton 1992 defaults
//! plus the single-nephron constants of Moore & Casellas (1994).
//! Reference: Guyton AC, Montani JP, Hall JE, Manning RD. Computer models for
//! designing hypertension experiments and studying concepts. Am J Med Sci, 1988.

use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::state::registry::{named_scalars, NamedScalars, Registry};

named_scalars! {
    /// Every model parameter with its reference value.
    pub struct Parameters {
        /// Afferent hematocrit
        /// Reference: Moore LC, Casellas D. Ann Biomed Eng, 1994
        H0 = 0.45,
        /// Afferent plasma protein concentration (g/dl); recomputed from cpp each step
        C0 = 5.5,
        Re = 0.3,
        Rg = 0.008,
        Rb = 0.3,
        /// Single-nephron arterial pressure used by standalone sweeps (mmHg)
        Pas = 140.0,
        /// Reference arterial pressure for the myogenic response (mmHg)
        Paso = 100.0,
        /// Glomerular ultrafiltration coefficient (nl/min/mmHg)
        /// Reference: Moore & Casellas 1994
        Kf = 2.5,
        Pc = 4.0,
        Fp = 0.6,
        Fs = 0.1,
        Rp = 0.0,
        Rs = 0.0,
        Ip = 0.0,
        Cic = 150.0,
        Cim = 300.0,
        /// Ascending limb NaCl permeability (cm^2/min)
        Ps = 0.0006000000000000001,
        /// Maximal active NaCl transport rate of the ascending limb
        Vm = 0.0042,
        K1 = 500.0,
        alx = 0.3,
        alr = 0.001,
        /// Lower TGF threshold for macula densa NaCl (mM)
        Ct = 25.0,
        /// Saturation concentration for TGF (mM)
        Cs = 65.0,
        /// TGF gain on afferent resistance per mM of macula densa NaCl
        /// Reference: Moore & Casellas 1994
        Ktgf = 0.0043,
        Ga = 0.3,
        Gd = 0.3,
        /// Fixed micro-step of the fast circulatory subsystem (min)
        i2 = 0.003,
        /// Maximum slow step size (min)
        i3 = 5.0,
        /// Sub-step of the renal autoregulation loop (min)
        i4 = 0.1,
        /// Relaxation factor of the urinary excretion loop
        i6 = 0.1,
        /// Sub-step of the arterial PO2 loop (min)
        i8 = 0.02,
        i10 = 0.01,
        i12 = 0.01,
        /// Sub-step of the intracellular volume loop (min)
        i14 = 1.0,
        i16 = 0.01,
        i18 = 1.0,
        i20 = 0.01,
        /// Arterial pressure deviation allowed between micro-steps (mmHg)
        pa4 = 0.2,
        /// Flow deviation allowed between micro-steps (L/min)
        qaolm = 0.1,
        /// Plasma volume change allowed per slow step (L)
        vp1 = 0.0001,
        mdflw2 = 1e-05,
        po2adv = 0.01,
        z4 = 0.1,
        z5 = 0.1,
        vid1 = 0.0001,
        ar1lm = 0.0001,
        ar2lm = 0.0001,
        amm1lm = 0.0001,
        a1k = 0.1,
        a2k = 60.0,
        a3k = 40000.0,
        a4k = 0.1,
        a4k2 = 40000.0,
        aark = 1.0,
        aarll = 8.0,
        adhinf = 0.0,
        adhkll = 0.2,
        adhkul = 3.0,
        adhpam = 0.3,
        adhpul = 85.0,
        adhtc = 30.0,
        adhvll = 0.8,
        adhvul = 2.0,
        ah10 = 0.5,
        ah11 = 1000.0,
        ah9 = 1.0,
        ahmnar = 0.3,
        ahthm = 2.0,
        alclk = 0.3,
        aldinf = 0.0,
        aldkns = 0.0,
        aldmm = 2.5,
        am1ll = 0.0,
        am1ul = 5.0,
        amcsns = 0.65,
        amkm = 0.5,
        amkmul = 1.0,
        amm4 = 0.005,
        amnall = 0.04,
        amnam = 0.8,
        amnaul = 15.0,
        amt = 60.0,
        ancsns = 0.4,
        anginf = 0.0,
        angkns = 0.0,
        anmald = 2.5,
        anmam = 1.5,
        anmarl = 0.86,
        anmem = 2.8,
        anmkel = 0.3,
        anmkem = 0.5,
        anmll = 0.7,
        anmnam = 0.0,
        anmslt = 2.0,
        anmtm = 1.0,
        anmul = 1.8,
        anptc = 4.0,
        anpxaf = 1.0,
        anpxul = 10.0,
        ant = 12.0,
        anull = 0.8,
        anum = 6.0,
        anuvm = 0.0,
        anv = 5000.0,
        anxm = 0.0,
        any = 0.1,
        arf = 0.0,
        auc1 = 1.0,
        audmp = 0.3,
        auk = 0.0005,
        aul = 0.15,
        aulpm = 0.0,
        aum1 = 1.0,
        aum2 = 2.0,
        aumax = 5.0,
        aumin = 0.4,
        aumk1 = 0.0,
        aun1 = 1.0,
        aus = 1.0,
        auslp = 1.0,
        /// Gain of the rapid autoregulation protocol
        autogn = 7.0,
        /// Rate of development of rapid autoregulation
        autok = 0.1,
        autosn = 0.9,
        auv = 0.5,
        aux = 1.0,
        barotc = 0.5,
        cfc = 0.01167,
        ckeex = 1.0,
        cmptss = 1.0,
        cn2 = 0.0588,
        cn7 = 0.2,
        cnr = 139.0,
        cpf = 0.0003,
        cpk = 0.00024,
        cpr = 40.0,
        cv = 0.13,
        dhdtr = 0.05,
        diuret = 1.0,
        dr = 0.0,
        dtnar = 0.675,
        dtnarl = 1e-06,
        eark = 1.0,
        earll = 25.0,
        efafr = 0.3,
        exc = 1.0,
        excml = 1.0,
        excxp = 1.0,
        excxp2 = 1.0,
        exe = 0.0,
        fis = 0.0,
        gcopf = 0.4,
        gflc = 0.0113,
        gfndmp = 3.0,
        gfnll = 0.001,
        /// Use the cubic Qalh to macula densa flow fit when > 0
        glmcubic = 0.0,
        gppd = 1.0,
        hm6 = 1725.0,
        hm8 = 1e-06,
        hmk = 90.0,
        /// Hematocrit of transfused blood (%)
        hmtrns = 40.0,
        hsl = 1.0,
        hsr = 1.0,
        htauml = 0.0,
        hyl = 60.0,
        /// Potassium intake (mEq/min)
        kid = 0.0738,
        korgn = 0.0,
        kortc = 14400.0,
        lpde = 1.5,
        lpk = 0.0,
        lppr = 0.0,
        mdfl1 = 0.2,
        mdflkm = 0.5,
        mdflwx = 0.1,
        mdmp = 0.0,
        /// Selects the single-nephron renal model when > 0
        newkidney = 0.0,
        /// Sodium intake (mEq/min)
        nid = 0.1,
        o2a = 0.1,
        o2chmo = 0.002,
        o2m = 160.0,
        omm = 60.0,
        paex = 0.5,
        pce = 2.0,
        pcr = 25.0,
        pghf = -4.3,
        pk2 = 0.79,
        pl2 = 0.4,
        pldf = 6.4,
        pm5 = 25.8,
        pok = 0.1,
        pom = 0.04,
        pom2 = 2.0,
        pon = 0.1,
        por = 35.0,
        poz = 2.0,
        pr1ll = 0.0,
        pxtp = 8.0,
        qrf = 0.15,
        rabsc = 0.0479,
        /// Fixed renal perfusion pressure when > 0 (mmHg)
        raprsp = 0.0,
        rar = 30.0,
        rcdfdp = 1.0,
        rcdfpc = 0.0,
        /// Functional renal mass (normal = 1)
        rek = 1.0,
        rfabdm = 0.3,
        rfabdp = 1.0,
        rfabkm = 0.3,
        rkc = 1e-05,
        rnagtc = 1.0,
        rnauad = 0.005,
        rnaugn = 1.5,
        rtppr = 0.9,
        rtpprs = 23.6,
        rtsprs = 6.0,
        rvrs = 10.0,
        rvsm = 3.2,
        sr = 1.0,
        sr2 = 1.0,
        srk = 5.0,
        srk2 = 10000.0,
        /// Fixed autonomic drive; overrides autonomic control when above aumin
        sta = 0.0,
        tensgn = 0.0,
        tenstc = 1.0,
        /// Transfusion duration trigger (min); the protocol runs while > 0
        timetr = 0.0,
        /// Transfusion rate (L/min); negative for blood loss
        trnsfs = 0.0,
        trpl = 0.0,
        tsslml = 0.0,
        tssltc = 0.0,
        tvddl = 30.0,
        u = 1.0,
        urform = 0.2524,
        vidml = 0.01,
        vntstm = 1.0,
        vptiss = 0.0175,
        vtsf = 12.0,
        vv9 = 2.73,
        x = 1.0,
        z = 1.0,
        z10 = 45.0,
        z11 = 0.01,
        z12 = 1.0,
        z13 = 0.625,
        z14 = 1.0,
        z16 = 1.0,
        z18 = 5.0,
        z19 = 5.0,
        z6 = 5.0,
        z7 = 5.0,
    }
}

impl Parameters {
    /// Load parameters from a JSON file, or use defaults if it doesn't exist.
    /// Missing fields take their default value.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded model parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse model parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Model parameters file not found, using defaults");
                Self::default()
            }
        }
    }
}

/// Errors from reading override files or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected '<name> <value>', got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("invalid setting {name} = {value}: must be {requirement}")]
    InvalidSetting {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("line {line}: {source}")]
    UnknownName {
        line: usize,
        #[source]
        source: crate::state::RegistryError,
    },
}

/// Applies whitespace-separated `<name> <value>` lines to `state`.
///
/// Blank lines and `#` comments are skipped. Any other line that does not
/// start with a known name and a number aborts the load. Returns the number
/// of values set.
pub fn read_overrides<T: NamedScalars, R: BufRead>(
    reader: R,
    registry: &Registry<T>,
    state: &mut T,
) -> Result<usize, ConfigError> {
    let mut count = 0;
    for (n, line) in reader.lines().enumerate() {
        let line_no = n + 1;
        let line = line.map_err(|source| ConfigError::Read {
            line: line_no,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let (name, value) = match (words.next(), words.next().map(str::parse::<f64>)) {
            (Some(name), Some(Ok(value))) => (name, value),
            _ => {
                return Err(ConfigError::Malformed {
                    line: line_no,
                    text: trimmed.to_string(),
                })
            }
        };

        registry
            .set(state, name, value)
            .map_err(|source| ConfigError::UnknownName {
                line: line_no,
                source,
            })?;
        count += 1;
    }
    Ok(count)
}

/// Reads an override file from disk into `state`.
pub fn load_overrides<T: NamedScalars, P: AsRef<Path>>(
    path: P,
    registry: &Registry<T>,
    state: &mut T,
) -> Result<usize, ConfigError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let count = read_overrides(std::io::BufReader::new(file), registry, state)?;
    log::info!("Read {} values from {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateRegistry;
    use std::io::Write;

    #[test]
    fn test_default_parameters() {
        let p = Parameters::default();
        assert_eq!(p.i2, 0.003);
        assert_eq!(p.i3, 5.0);
        assert_eq!(p.newkidney, 0.0);
        assert!((p.Ps - 6e-4).abs() < 1e-15);
    }

    #[test]
    fn test_read_overrides() {
        let reg = StateRegistry::new();
        let mut p = Parameters::default();
        let text = "# salt loading\nnid 0.5\n\nrek   0.3\n";

        let n = read_overrides(text.as_bytes(), &reg.params, &mut p).unwrap();
        assert_eq!(n, 2);
        assert_eq!(p.nid, 0.5);
        assert_eq!(p.rek, 0.3);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let reg = StateRegistry::new();
        let mut p = Parameters::default();
        let err = read_overrides("nid 0.5\nrek\n".as_bytes(), &reg.params, &mut p).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 2, .. }), "{}", err);

        let err = read_overrides("nid abc\n".as_bytes(), &reg.params, &mut p).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_unknown_name_aborts() {
        let reg = StateRegistry::new();
        let mut p = Parameters::default();
        let err = read_overrides("not_a_param 1\n".as_bytes(), &reg.params, &mut p).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownName { line: 1, .. }));
    }

    #[test]
    fn test_load_overrides_from_file() {
        let reg = StateRegistry::new();
        let mut v = crate::state::Variables::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pa 110").unwrap();
        writeln!(file, "cna 140.5").unwrap();

        let n = load_overrides(file.path(), &reg.vars, &mut v).unwrap();
        assert_eq!(n, 2);
        assert_eq!(v.pa, 110.0);
        assert_eq!(v.cna, 140.5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let reg = StateRegistry::new();
        let mut p = Parameters::default();
        let err = load_overrides("/nonexistent/params.txt", &reg.params, &mut p).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_json_partial_parameters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"rek\": 0.5}}").unwrap();
        let p = Parameters::load_or_default(file.path());
        assert_eq!(p.rek, 0.5);
        assert_eq!(p.i3, 5.0);
    }

    #[test]
    fn test_text_overrides_apply_over_json_parameters() {
        let reg = StateRegistry::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"rek\": 0.5, \"nid\": 0.2}}").unwrap();

        let mut p = Parameters::load_or_default(file.path());
        read_overrides("nid 0.4\n".as_bytes(), &reg.params, &mut p).unwrap();
        assert_eq!(p.rek, 0.5);
        assert_eq!(p.nid, 0.4);
    }

    #[test]
    fn test_bad_json_parameters_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"rek\": \"high\"}}").unwrap();
        let p = Parameters::load_or_default(file.path());
        assert_eq!(p.rek, Parameters::default().rek);
    }
}
