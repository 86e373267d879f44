//! Single-module sensitivity sweeps.
//!
//! For each value of a control (variable or parameter) the model is reset to
//! its defaults, the control is set, and one module runs once. The chosen
//! outputs are written as a space-separated table together with a gnuplot
//! script that plots them against the control.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::{EngineConfig, Parameters};
use crate::engine::{Module, Pipeline};
use crate::state::{StateRegistry, Variables};

/// One sweep definition.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub module: Module,
    pub control: String,
    pub min: f64,
    pub inc: f64,
    pub max: f64,
    pub outputs: Vec<String>,
}

/// Files written by [`run_sweep`].
#[derive(Debug, Clone)]
pub struct SweepFiles {
    pub data: PathBuf,
    pub script: PathBuf,
}

impl Sweep {
    /// Control values from `min` while `x < max + inc`, stepping by `inc`.
    pub fn values(&self) -> Vec<f64> {
        let mut xs = Vec::new();
        if !(self.inc > 0.0) {
            return xs;
        }
        let mut x = self.min;
        while x < self.max + self.inc {
            xs.push(x);
            x += self.inc;
        }
        xs
    }

    pub fn basename(&self) -> String {
        format!("{}_{}", self.module, self.control)
    }

    /// Writes the sweep table to `out`.
    pub fn write_table<W: Write>(&self, out: &mut W, registry: &StateRegistry) -> Result<()> {
        let is_var = registry.vars.contains(&self.control);
        if !is_var && !registry.params.contains(&self.control) {
            bail!("unknown control '{}'", self.control);
        }

        write!(out, "{} {} ", self.control, self.control)?;
        for name in &self.outputs {
            write!(out, "{} ", name)?;
        }
        writeln!(out)?;

        let config = EngineConfig::default();
        for x in self.values() {
            let mut p = Parameters::default();
            let mut v = Variables::default();
            if is_var {
                registry.vars.set(&mut v, &self.control, x)?;
            } else {
                registry.params.set(&mut p, &self.control, x)?;
            }

            Pipeline::new(&config).run_module(self.module, &p, &mut v);

            let norm_x = (x - self.min) / (self.max - self.min);
            write!(out, "{:e} {:e} ", x, norm_x)?;
            for name in &self.outputs {
                let y = registry.lookup(&p, &v, name).unwrap_or(f64::NAN);
                write!(out, "{:e} ", y)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Gnuplot script that plots every output column against the control.
    pub fn gnuplot_script(&self, datafile: &str) -> String {
        let mut script = String::from("#!/usr/bin/gnuplot -p\n");
        script.push_str("set terminal postscript monochrome rounded 32\n");
        script.push_str(&format!("set output '{}.eps'\n", self.basename()));
        script.push_str(&format!("set xlabel '{}'\n", self.control));
        let plots: Vec<String> = (0..self.outputs.len())
            .map(|i| {
                let source = if i == 0 { format!("'{}'", datafile) } else { "''".to_string() };
                format!("{} using 1:{} title column({}) with lines lw 4", source, i + 3, i + 3)
            })
            .collect();
        script.push_str(&format!("plot {}\n", plots.join(", ")));
        script
    }
}

/// Writes `<module>_<control>.ssv` and `.gp` into `dir`.
pub fn run_sweep(sweep: &Sweep, dir: &Path) -> Result<SweepFiles> {
    let registry = StateRegistry::new();
    let data = dir.join(format!("{}.ssv", sweep.basename()));
    let script = dir.join(format!("{}.gp", sweep.basename()));

    let mut out = std::io::BufWriter::new(
        std::fs::File::create(&data).with_context(|| format!("failed to create {}", data.display()))?,
    );
    sweep.write_table(&mut out, &registry)?;
    out.flush()?;

    let datafile = data
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    std::fs::write(&script, sweep.gnuplot_script(&datafile))
        .with_context(|| format!("failed to write {}", script.display()))?;
    make_executable(&script)?;

    log::info!("Sensitivity sweep written to {}", data.display());
    Ok(SweepFiles { data, script })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o700);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
