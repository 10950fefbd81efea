//! File loading for jikan configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{Config, ConfigLayer};

impl Config {
    /// Loads the global layer from `~/.config/jikan/config.toml`.
    ///
    /// A missing file is an empty layer; the file is never created.
    pub(super) fn load_global() -> Result<ConfigLayer> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(ConfigLayer::default());
        }
        load_file(&path)
    }

    /// Look for jikan.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<ConfigLayer>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                return load_file(&candidate).map(Some);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }
}

fn load_file(path: &Path) -> Result<ConfigLayer> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse config at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_BASE_URL, DEFAULT_GREETING, DEFAULT_MODEL, MAX_TOOL_ROUNDS};

    fn layer(toml_str: &str) -> ConfigLayer {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_layer_gives_defaults() {
        let config = Config::from(layer(""));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_tool_rounds(), MAX_TOOL_ROUNDS);
        assert_eq!(config.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_project_over_global() {
        let global = layer(
            r#"
model = "gpt-4o"
base_url = "https://global.example/v1"
max_tool_rounds = 3
"#,
        );
        let project = layer(
            r#"
greeting = "Ask me the time anywhere."
max_tool_rounds = 5
"#,
        );
        let config = Config::from(project.over(global));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url(), "https://global.example/v1");
        assert_eq!(config.greeting, "Ask me the time anywhere.");
        assert_eq!(config.max_tool_rounds(), 5);
    }

    #[test]
    fn test_project_can_set_the_default_value_explicitly() {
        let global = layer(r#"model = "gpt-4o""#);
        let project = layer(&format!("model = \"{}\"", DEFAULT_MODEL));
        let config = Config::from(project.over(global));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_load_file_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("jikan-bad-{}.toml", std::process::id()));
        fs::write(&path, "model = [").unwrap();
        let err = load_file(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
