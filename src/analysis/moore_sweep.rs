//! Standalone single-nephron pressure sweep.

use std::io::Write;

use anyhow::Result;

use crate::config::{NephronConfig, Parameters};
use crate::renal::{NephronParams, NephronSolution, NephronSolver};

/// Arterial pressures swept, 80 to 160 mmHg in 0.5 mmHg steps.
pub fn sweep_pressures() -> impl Iterator<Item = f64> {
    (0..=160).map(|k| 80.0 + 0.5 * k as f64)
}

/// Solves one nephron with the standalone constants at each pressure.
pub fn sweep(p: &Parameters, config: NephronConfig) -> Vec<(f64, NephronSolution)> {
    let params = NephronParams::from(p);
    let mut solver = NephronSolver::new(config);
    sweep_pressures()
        .map(|pas| (pas, solver.solve(&params, pas)))
        .collect()
}

/// Writes `PA GFR Qalh NaMD dR_TGF R_A`, tab separated.
pub fn write_sweep<W: Write>(out: &mut W, p: &Parameters, config: NephronConfig) -> Result<()> {
    writeln!(out, "PA\tGFR\tQalh\tNaMD\tdR_TGF\tR_A")?;
    for (pas, s) in sweep(p, config) {
        writeln!(out, "{}\t{}\t{}\t{}\t{}\t{}", pas, s.GFR, s.Qalh, s.Ci, s.dRtgf, s.Ra)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_grid() {
        let pressures: Vec<f64> = sweep_pressures().collect();
        assert_eq!(pressures.len(), 161);
        assert_eq!(pressures[0], 80.0);
        assert_eq!(pressures[160], 160.0);
    }

    #[test]
    fn test_gfr_is_autoregulated() {
        let results = sweep(&Parameters::default(), NephronConfig::default());
        let gfr_at = |pa: f64| {
            results
                .iter()
                .find(|(p, _)| *p == pa)
                .map(|(_, s)| s.GFR)
                .unwrap()
        };
        // Filtration varies far less than pressure above 100 mmHg
        let change = (gfr_at(160.0) - gfr_at(100.0)) / gfr_at(100.0);
        assert!(change.abs() < 0.1, "relative GFR change {}", change);
    }

    #[test]
    fn test_output_table() {
        let mut buf = Vec::new();
        write_sweep(&mut buf, &Parameters::default(), NephronConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("PA\tGFR\tQalh\tNaMD\tdR_TGF\tR_A\n80\t"));
        assert_eq!(text.lines().count(), 162);
    }
}
