//! Where jikan looks for its global config file.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::types::Config;
use crate::constants::{APP_NAME, CONFIG_FILENAME};

impl Config {
    /// `jikan/` under the platform config directory (`$XDG_CONFIG_HOME` on Linux).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .context("No config directory on this platform")
    }

    /// Full path of the global `config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }
}
