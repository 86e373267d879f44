//! CSV time-series export for simulation runs.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::state::Variables;

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesRecord {
    /// Simulation time (min)
    pub time_min: f64,
    /// Slow step size (min)
    pub step_min: f64,
    /// Mean arterial pressure (mmHg)
    pub pa_mmHg: f64,
    /// Right atrial pressure (mmHg)
    pub pra_mmHg: f64,
    /// Cardiac output (L/min)
    pub cardiac_output_L_min: f64,
    /// Renal blood flow (L/min)
    pub rbf_L_min: f64,
    /// Glomerular filtration rate (L/min)
    pub gfr_L_min: f64,
    /// Plasma volume (L)
    pub plasma_volume_L: f64,
    /// Hematocrit (%)
    pub hematocrit: f64,
    /// Extracellular Na+ (mM)
    pub na_mM: f64,
    /// Extracellular K+ (mM)
    pub k_mM: f64,
    /// Total body water (L)
    pub body_water_L: f64,
    /// Urine output (L/min)
    pub urine_L_min: f64,
    /// Sodium excretion (mmol/min)
    pub na_excretion: f64,
    /// Potassium excretion (mmol/min)
    pub k_excretion: f64,
    /// Angiotensin multiplier
    pub angiotensin: f64,
    /// Autonomic drive
    pub autonomic: f64,
}

impl From<&Variables> for TimeSeriesRecord {
    fn from(v: &Variables) -> Self {
        Self {
            time_min: v.t,
            step_min: v.i,
            pa_mmHg: v.pa,
            pra_mmHg: v.pra,
            cardiac_output_L_min: v.qao,
            rbf_L_min: v.rbf,
            gfr_L_min: v.gfr,
            plasma_volume_L: v.vp,
            hematocrit: v.hm,
            na_mM: v.cna,
            k_mM: v.cke,
            body_water_L: v.vtw,
            urine_L_min: v.vud,
            na_excretion: v.nod,
            k_excretion: v.kod,
            angiotensin: v.anm,
            autonomic: v.au,
        }
    }
}

/// CSV exporter for time-series data
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Sample interval in simulated minutes
    sample_interval_min: f64,
    /// Last sample time
    last_sample_time: f64,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create a new CSV exporter with the given sample interval
    ///
    /// Creates the exports directory if it doesn't exist.
    /// Filename is auto-generated with timestamp.
    pub fn new(sample_interval_min: f64) -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("timeseries_{}.csv", timestamp));
        Self::to_path(path, sample_interval_min)
    }

    /// Create an exporter writing to `path`
    pub fn to_path<P: AsRef<Path>>(path: P, sample_interval_min: f64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval_min,
            last_sample_time: f64::NEG_INFINITY, // Ensure first sample is recorded
            path,
        })
    }

    /// Record a sample if the interval has elapsed
    pub fn maybe_record(&mut self, v: &Variables) -> Result<bool> {
        if v.t - self.last_sample_time >= self.sample_interval_min {
            self.record(v)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Force record a sample regardless of interval
    pub fn record(&mut self, v: &Variables) -> Result<()> {
        self.writer.serialize(TimeSeriesRecord::from(v))?;
        self.last_sample_time = v.t;
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
