//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use docfields_core::DocfieldsConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docfields")
        .join("config.json")
}

/// Load the configuration named on the command line, else the default file
/// when it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocfieldsConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(DocfieldsConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(DocfieldsConfig::from_file(&default_path)?)
    } else {
        Ok(DocfieldsConfig::default())
    }
}
