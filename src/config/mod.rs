//! Configuration types and loading for jikan.
//!
//! Settings are optional TOML: a global file at the platform's XDG config
//! path (e.g. `~/.config/jikan/config.toml` on Linux) overlaid by a project
//! `jikan.toml`. The API key normally comes from `OPENAI_API_KEY`.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let layered = match Self::load_project()? {
            Some(project) => project.over(global),
            None => global,
        };

        let mut config = Config::from(layered);
        config.resolve_substitutions();
        Ok(config)
    }
}
