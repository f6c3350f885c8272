//! Solver settings document.
//!
//! Every numeric knob of the flow solvers in one serde document. Missing
//! sections and fields fall back to their defaults, so a settings file only
//! needs to name what it changes.

use crate::friction::FrictionConfig;
use crate::laminar::LaminarConfig;
use crate::pipe_flow::PipeFlowConfig;
use crate::sweep::SweepConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(#[from] crate::error::FlowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub laminar: LaminarConfig,
    pub pipe: PipeFlowConfig,
    pub friction: FrictionConfig,
    pub sweep: SweepConfig,
}

impl Settings {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> SettingsResult<()> {
        self.laminar.validated()?;
        self.pipe.validated()?;
        self.friction.validated()?;
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> SettingsResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> SettingsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn load_yaml(path: &Path) -> SettingsResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    Settings::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, settings: &Settings) -> SettingsResult<()> {
    settings.validate()?;
    std::fs::write(path, settings.to_yaml_string()?)?;
    Ok(())
}
