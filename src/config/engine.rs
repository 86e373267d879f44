//! Driver and solver settings that are not model parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting {
            name,
            value,
            requirement: "finite and positive",
        })
    }
}

fn at_least_one(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting {
            name,
            value: value as f64,
            requirement: "at least 1",
        })
    }
}

/// Configuration for the simulation driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Slow step size at t = 0 (min). Default: 0.003
    pub initial_dt_min: f64,
    /// Run length when no experiment gives a stop time (min). Default: 4 weeks
    pub default_duration_min: f64,
    /// Run the inactive renal model on a copy of the state and log differences
    pub shadow_renal: bool,
    /// Single-nephron solver limits
    pub nephron: NephronConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_dt_min: 0.003,
            default_duration_min: 60.0 * 24.0 * 7.0 * 4.0, // four weeks
            shadow_renal: false,
            nephron: NephronConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load engine settings from a JSON file, or use defaults if it doesn't exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("Loaded engine configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(e) => {
                        log::warn!("Invalid engine configuration: {}, using defaults", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to parse engine configuration: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Engine configuration file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Checks every setting a run depends on to terminate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_dt_min", self.initial_dt_min)?;
        positive("default_duration_min", self.default_duration_min)?;
        self.nephron.validate()
    }

    /// Replaces each invalid setting with its default.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;
        if let Err(e) = positive("initial_dt_min", config.initial_dt_min) {
            log::warn!("{}, using {}", e, defaults.initial_dt_min);
            config.initial_dt_min = defaults.initial_dt_min;
        }
        if let Err(e) = positive("default_duration_min", config.default_duration_min) {
            log::warn!("{}, using {}", e, defaults.default_duration_min);
            config.default_duration_min = defaults.default_duration_min;
        }
        config.nephron = config.nephron.sanitized();
        config
    }
}

/// Limits for the single-nephron solver loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NephronConfig {
    /// Shooting corrections before accepting the last iterate.
    /// Pas 40-200 mmHg needs at most 14.
    pub max_shooting_iterations: usize,
    /// TGF relaxation passes before accepting the last iterate
    pub max_tgf_iterations: usize,
    /// Residual tolerance of the shooting method (mmHg)
    pub shooting_tolerance: f64,
    /// Agreement required between successive TGF resistance estimates
    pub tgf_tolerance: f64,
    /// Euler step along the normalized capillary length
    pub capillary_dx: f64,
}

impl Default for NephronConfig {
    fn default() -> Self {
        Self {
            max_shooting_iterations: 1000,
            max_tgf_iterations: 500,
            shooting_tolerance: 1e-3,
            tgf_tolerance: 1e-3,
            capillary_dx: 1e-3,
        }
    }
}

impl NephronConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least_one("nephron.max_shooting_iterations", self.max_shooting_iterations)?;
        at_least_one("nephron.max_tgf_iterations", self.max_tgf_iterations)?;
        positive("nephron.shooting_tolerance", self.shooting_tolerance)?;
        positive("nephron.tgf_tolerance", self.tgf_tolerance)?;
        positive("nephron.capillary_dx", self.capillary_dx)?;
        if self.capillary_dx > 1.0 {
            return Err(ConfigError::InvalidSetting {
                name: "nephron.capillary_dx",
                value: self.capillary_dx,
                requirement: "at most 1",
            });
        }
        Ok(())
    }

    /// Replaces the whole set with defaults if any limit is invalid.
    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("{}, using default nephron limits", e);
                Self::default()
            }
        }
    }
}
