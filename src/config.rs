//! Display settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/docforest/docforest.toml`
//! 3. Local config: `./.docforest.toml`
//! 4. Environment variables: `DOCFOREST_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// When to colorize output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Apply to the global color override; Auto defers to tty detection.
    pub fn apply(self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {}
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    /// When to colorize rendered output
    pub color: ColorMode,
    /// Uniform indent of relationship sections
    pub section_indent: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            section_indent: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings with the layered precedence documented above.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("display.color", "auto")?
            .set_default("display.section_indent", 2)?;

        if let Some(path) = global_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(File::with_name(".docforest").required(false));
        builder = builder.add_source(Environment::with_prefix("DOCFOREST").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// TOML template written by `config init`.
    pub fn template() -> String {
        toml::to_string_pretty(&Settings::default()).unwrap_or_default()
    }
}

/// Path of the global config file, if a home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "docforest").map(|dirs| dirs.config_dir().join("docforest.toml"))
}

/// Path of the local (per-directory) config file.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".docforest.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.display.color, ColorMode::Auto);
        assert_eq!(settings.display.section_indent, 2);
    }

    #[test]
    fn test_template_is_valid_toml() {
        let template = Settings::template();
        let parsed: Settings = toml::from_str(&template).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
