use anyhow::{Context, Result};
use command_service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Word that arms the assistant in the interactive loop
    pub wake_word: Option<String>,
    pub service: ServiceConfig,
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))
            }
            Some(path) => {
                tracing::warn!("Config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}
