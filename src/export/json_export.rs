//! JSON state export for simulation snapshots.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::state::ModelState;

/// Full state export structure
#[derive(Debug, Clone, Serialize)]
pub struct StateExport {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Every parameter and variable by name
    pub state: ModelState,
}

impl StateExport {
    fn now(state: &ModelState) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            state: state.clone(),
        }
    }
}

/// Export current simulation state to JSON
///
/// Creates the exports directory if it doesn't exist.
/// Filename is auto-generated with timestamp: `state_YYYYMMDD_HHMMSS.json`
pub fn export_state_json(state: &ModelState) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let filename = format!("state_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    export_state_json_to(state, &path)?;
    Ok(path)
}

/// Export state to a specific file
pub fn export_state_json_to(state: &ModelState, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &StateExport::now(state))?;

    log::info!("JSON state exported: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::state::{StateRegistry, Variables};

    #[test]
    fn test_export_contains_every_name() {
        let reg = StateRegistry::new();
        let state = reg.snapshot(&Parameters::default(), &Variables::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        export_state_json_to(&state, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["state"]["variables"]["pa"], 100.0);
        assert_eq!(
            json["state"]["parameters"].as_object().unwrap().len(),
            reg.params.len()
        );
    }
}
