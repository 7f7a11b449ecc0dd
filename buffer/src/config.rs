//! Buffer defaults loaded from `config.toml`.
//!
//! [`Config::load_with_overrides`] picks the file: CLI override > discovered path >
//! the embedded default at the workspace root.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Columns a tab advances to. Must be at least 1.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Record undo deltas in new buffers.
    #[serde(default = "default_undo_enabled")]
    pub undo_enabled: bool,

    /// Open new buffers read-only.
    pub read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            undo_enabled: default_undo_enabled(),
            read_only: false,
        }
    }
}

fn default_tab_width() -> usize {
    8
}

fn default_undo_enabled() -> bool {
    true
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with priority: CLI override > discovered path > defaults.
    pub fn load_with_overrides(
        cli_override: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        if let Some(path) = discovered_path {
            return Self::load(path);
        }
        Self::load_embedded()
    }

    fn load_embedded() -> Result<Self> {
        let source = include_str!("../../config.toml");
        let config: Config =
            toml::from_str(source).context("Failed to parse embedded config.toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.tab_width >= 1, "tab_width must be at least 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_empty_config() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_custom_values() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
tab_width = 4
undo_enabled = false
read_only = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.tab_width, 4);
        assert!(!config.undo_enabled);
        assert!(config.read_only);
    }

    #[test]
    fn errors_on_invalid_toml() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(&config_path, "invalid toml {{{{").unwrap();

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[test]
    fn errors_on_unknown_field() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(&config_path, "buffer_font_size = 12.0").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn errors_on_zero_tab_width() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("config.toml");
        std::fs::write(&config_path, "tab_width = 0").unwrap();

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("tab_width"));
    }

    #[test]
    fn errors_on_nonexistent_file() {
        let tmp_dir = tempdir().unwrap();
        let config_path = tmp_dir.path().join("nonexistent.toml");

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[test]
    fn cli_override_takes_priority() {
        let tmp_dir = tempdir().unwrap();
        let cli_path = tmp_dir.path().join("cli.toml");
        let discovered_path = tmp_dir.path().join("discovered.toml");
        std::fs::write(&cli_path, "tab_width = 2").unwrap();
        std::fs::write(&discovered_path, "tab_width = 3").unwrap();

        let config = Config::load_with_overrides(Some(&cli_path), Some(&discovered_path)).unwrap();
        assert_eq!(config.tab_width, 2);

        let config = Config::load_with_overrides(None, Some(&discovered_path)).unwrap();
        assert_eq!(config.tab_width, 3);
    }

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = Config::load_with_overrides(None, None).unwrap();
        assert_eq!(config, Config::default());
    }
}
