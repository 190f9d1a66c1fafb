//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> Result<MetronomeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: MetronomeConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, otherwise use the built-in defaults
pub fn load_or_default(path: Option<&Path>) -> Result<MetronomeConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MetronomeConfig::default()),
    }
}
