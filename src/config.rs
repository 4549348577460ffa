use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dashboard configuration, read from a JSON file.
///
/// ```json
/// {
///   "drought_db": "data/drought.db",
///   "shapes_db": "data/shapes.db",
///   "mapbox": { "token": "pk.…" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  pub drought_db: PathBuf,
  pub shapes_db: PathBuf,
  pub mapbox: MapboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapboxConfig {
  pub token: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read config file: {0}")]
  Io(#[from] std::io::Error),
  #[error("config file is not valid JSON: {0}")]
  Parse(#[from] serde_json::Error),
}

impl Config {
  pub fn from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
  }
}
