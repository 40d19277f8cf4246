//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/graftree/graftree.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `GRAFTREE_*` prefix, `__` between nested keys,
//!    e.g. `GRAFTREE_RENDER__SHOW_LEVEL=true`

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::SettingsError;

/// Branch glyphs used when drawing a subtree.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    /// `├──` / `└──`
    #[default]
    Unicode,
    /// `|--` / `` `-- ``
    Ascii,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    pub glyphs: GlyphStyle,
    /// Append `(level n)` to every node label
    pub show_level: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
}

/// Get the XDG config directory for graftree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "graftree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("graftree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// The global file is optional; `file`, when given, must exist.
    #[instrument(level = "debug")]
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(File::from(global_path).required(false));
        }
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("GRAFTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_draw_unicode_without_levels() {
        let settings = Settings::default();
        assert_eq!(settings.render.glyphs, GlyphStyle::Unicode);
        assert!(!settings.render.show_level);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let settings = Settings::from_toml_str("[render]\nshow_level = true\n").unwrap();
        assert!(settings.render.show_level);
        assert_eq!(settings.render.glyphs, GlyphStyle::Unicode);
    }

    #[test]
    fn toml_round_trip() {
        let settings = Settings {
            render: RenderSettings {
                glyphs: GlyphStyle::Ascii,
                show_level: true,
            },
        };
        let text = settings.to_toml_string().unwrap();
        assert!(text.contains("glyphs = \"ascii\""));
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn unknown_glyph_style_is_rejected() {
        assert!(matches!(
            Settings::from_toml_str("[render]\nglyphs = \"braille\"\n"),
            Err(SettingsError::Parse(_))
        ));
    }
}
