//! Program files: a JSON description of one HLM week or 5/3/1 cycle.
//!
//! ```json
//! {
//!   "program": "wendler",
//!   "formula": "brzycki",
//!   "lifts": { "squat": { "weight": 120, "reps": 5 } },
//!   "templates": ["fsl"],
//!   "fsl_params": { "sets": 3, "reps": 5 }
//! }
//! ```
//!
//! Fields left out take the same defaults as the command line.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Lift, Plan};
use crate::error::{ConfigError, PlanError};
use crate::formulas::{Formula, LiftInput};
use crate::hlm::{HlmConfig, build_hlm_plan};
use crate::wendler::{WendlerConfig, build_wendler_plan};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "program", rename_all = "lowercase")]
pub enum ProgramConfig {
    Hlm(HlmConfig),
    Wendler(WendlerFile),
}

/// A 5/3/1 configuration whose lifts may be given as rep-max performances.
#[derive(Debug, Clone, Deserialize)]
pub struct WendlerFile {
    #[serde(default)]
    pub formula: Formula,
    /// Performances that replace the plain maxes in `settings`.
    #[serde(default)]
    pub lifts: BTreeMap<Lift, LiftInput>,
    #[serde(flatten)]
    pub settings: WendlerConfig,
}

impl WendlerFile {
    /// Resolves lift performances into maxes.
    pub fn into_config(self) -> Result<WendlerConfig, PlanError> {
        let mut config = self.settings;
        config.apply_lift_inputs(&self.lifts, self.formula)?;
        Ok(config)
    }
}

impl ProgramConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidFile(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProgramConfig::Hlm(_) => "hlm",
            ProgramConfig::Wendler(_) => "wendler",
        }
    }

    /// Validates the configuration and builds its plan.
    pub fn build(self) -> Result<Plan, PlanError> {
        match self {
            ProgramConfig::Hlm(config) => Ok(build_hlm_plan(&config)?),
            ProgramConfig::Wendler(file) => Ok(build_wendler_plan(&file.into_config()?)?),
        }
    }
}

/// Loads a program file.
///
/// # Errors
/// Returns ConfigError if the file is missing, unreadable, or not a valid
/// program description.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<ProgramConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::CannotRead(format!("{}: {}", path.display(), e)))?;

    ProgramConfig::from_json(&text)
}
