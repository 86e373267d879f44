//! Instruments that print or record the state on permitted notifications.
//!
//! Each writes to any `std::io::Write` sink. A failed write deregisters the
//! instrument rather than aborting the run.

use std::io::Write;

use crate::export::CsvExporter;
use crate::instrument::{Instrument, Observation};

/// Prints `t` and a list of named variables, one row per notification.
pub struct VarsInstrument<W: Write> {
    out: W,
    sep: String,
    names: Vec<String>,
    header_written: bool,
}

impl<W: Write> VarsInstrument<W> {
    pub fn new(out: W, sep: &str, names: Vec<String>) -> Self {
        Self {
            out,
            sep: sep.to_string(),
            names,
            header_written: false,
        }
    }

    fn write_row(&mut self, obs: &Observation) -> std::io::Result<()> {
        if !self.header_written {
            write!(self.out, "t")?;
            for name in &self.names {
                write!(self.out, "{}{}", self.sep, name)?;
            }
            writeln!(self.out)?;
            self.header_written = true;
        }

        write!(self.out, "{}", obs.vars.t)?;
        for name in &self.names {
            let value = obs.lookup(name).unwrap_or(f64::NAN);
            write!(self.out, "{}{}", self.sep, value)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Instrument for VarsInstrument<W> {
    fn name(&self) -> &'static str {
        "vars"
    }

    fn observe(&mut self, obs: &Observation) -> bool {
        if self.names.is_empty() {
            return false;
        }
        keep_on_success(self.name(), self.write_row(obs))
    }
}

const RENAL_COLUMNS: [&str; 8] = ["t", "pa", "kod", "nod", "vud", "rbf", "mdflw", "i5"];

/// Prints the renal outputs: `t pa kod nod vud rbf mdflw i5`.
pub struct RenalInstrument<W: Write> {
    out: W,
    sep: String,
    header_written: bool,
}

impl<W: Write> RenalInstrument<W> {
    pub fn new(out: W, sep: &str) -> Self {
        Self {
            out,
            sep: sep.to_string(),
            header_written: false,
        }
    }

    fn write_row(&mut self, obs: &Observation) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{}", RENAL_COLUMNS.join(self.sep.as_str()))?;
            self.header_written = true;
        }
        let v = obs.vars;
        let row = [v.t, v.pa, v.kod, v.nod, v.vud, v.rbf, v.mdflw, v.i5]
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(self.sep.as_str());
        writeln!(self.out, "{}", row)
    }
}

impl<W: Write> Instrument for RenalInstrument<W> {
    fn name(&self) -> &'static str {
        "renal"
    }

    fn observe(&mut self, obs: &Observation) -> bool {
        keep_on_success(self.name(), self.write_row(obs))
    }
}

/// Prints arterial pressure against time.
pub struct PressureInstrument<W: Write> {
    out: W,
}

impl<W: Write> PressureInstrument<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Instrument for PressureInstrument<W> {
    fn name(&self) -> &'static str {
        "pressure"
    }

    fn observe(&mut self, obs: &Observation) -> bool {
        let result = writeln!(self.out, "t: {:<7}\tpa: {:<7}", obs.vars.t, obs.vars.pa);
        keep_on_success(self.name(), result)
    }
}

/// Appends a CSV row every `interval` simulated minutes.
pub struct CsvRecorder {
    exporter: CsvExporter,
}

impl CsvRecorder {
    pub fn new(exporter: CsvExporter) -> Self {
        Self { exporter }
    }
}

impl Instrument for CsvRecorder {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn observe(&mut self, obs: &Observation) -> bool {
        match self.exporter.maybe_record(obs.vars) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("CSV export to {} failed: {}", self.exporter.path().display(), e);
                false
            }
        }
    }
}

fn keep_on_success(name: &str, result: std::io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Instrument '{}' failed to write: {}", name, e);
            false
        }
    }
}
