//! JSON files read at startup: the agent configuration and the grains file.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use winext_types::{config::ExtConfig, grains::Grains, ExtError, Result};

/// Load configuration; a missing path means defaults.
pub fn load_config(path: Option<&Path>) -> Result<ExtConfig> {
    match path {
        Some(path) => ExtConfig::from_json(&read(path)?),
        None => Ok(ExtConfig::default()),
    }
}

/// Load a grains file holding one JSON object.
pub fn load_grains(path: &Path) -> Result<Grains> {
    let raw = read(path)?;
    let map: Map<String, Value> = serde_json::from_str(&raw).map_err(|e| ExtError::Fs {
        path: path.display().to_string(),
        message: format!("grains file is not a JSON object: {}", e),
    })?;
    log::debug!("Loaded {} grain(s) from {}", map.len(), path.display());
    Ok(Grains::from(map))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ExtError::Fs {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
