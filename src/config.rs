//! Application settings read from an optional `quickplot.json`.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "quickplot.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where "Export Data" writes the report.
    pub report_file: PathBuf,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
    /// Open a saved snapshot with the system viewer.
    pub open_after_save: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            report_file: PathBuf::from("result.txt"),
            snapshot_width: 1000,
            snapshot_height: 800,
            open_after_save: true,
            window_width: 520.0,
            window_height: 420.0,
        }
    }
}

impl AppConfig {
    /// Load `quickplot.json` from the working directory, or defaults.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }

        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(config)
    }
}
