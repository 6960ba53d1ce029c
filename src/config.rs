//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mindmap/mindmap.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `MINDMAP_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::{Spacing, DEFAULT_ROOT_TITLE};
use crate::application::ApplicationError;

/// Document defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Start the document store readonly
    pub readonly: bool,
    /// Title of the root of a new document
    pub root_title: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            readonly: false,
            root_title: DEFAULT_ROOT_TITLE.to_string(),
        }
    }
}

/// Monospace text measurement used outside a real renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasureSettings {
    /// Width of one character as a fraction of the font size
    pub char_width: f64,
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self { char_width: 0.6 }
    }
}

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: Spacing,
    pub editor: EditorSettings,
    pub measure: MeasureSettings,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mindmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mindmap.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file which must exist when given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Same as [`Settings::load`] with the global file location injected.
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("layout.min_topic_height", defaults.layout.min_topic_height)
            .map_err(config_err)?
            .set_default("layout.max_topic_width", defaults.layout.max_topic_width)
            .map_err(config_err)?
            .set_default("layout.padding", defaults.layout.padding)
            .map_err(config_err)?
            .set_default("layout.font_size", defaults.layout.font_size)
            .map_err(config_err)?
            .set_default("layout.line_height", defaults.layout.line_height)
            .map_err(config_err)?
            .set_default("layout.depth_offset", defaults.layout.depth_offset)
            .map_err(config_err)?
            .set_default("editor.readonly", defaults.editor.readonly)
            .map_err(config_err)?
            .set_default("editor.root_title", defaults.editor.root_title.clone())
            .map_err(config_err)?
            .set_default("measure.char_width", defaults.measure.char_width)
            .map_err(config_err)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("MINDMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let layout = &self.layout;
        let positive = [
            ("layout.max_topic_width", layout.max_topic_width),
            ("layout.font_size", layout.font_size),
            ("layout.line_height", layout.line_height),
        ];
        let non_negative = [
            ("layout.min_topic_height", layout.min_topic_height),
            ("layout.padding", layout.padding),
            ("layout.depth_offset", layout.depth_offset),
            ("measure.char_width", self.measure.char_width),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{key} must be positive, got {value}"),
                });
            }
        }
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{key} must not be negative, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mindmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/mindmap/mindmap.toml
#   Explicit: --config <file>
#   Env:      MINDMAP_<SECTION>__<KEY>, e.g. MINDMAP_LAYOUT__PADDING=8

[layout]
# Minimum height of a topic's text area
# min_topic_height = 30.0

# Titles wider than this wrap onto more lines
# max_topic_width = 200.0

# Gap between a topic and its children, and between sibling subtrees
# padding = 12.0

# font_size = 14.0
# line_height = 1.4

# Extra horizontal distance per depth level, room for connector curves
# depth_offset = 70.0

[editor]
# readonly = false
# root_title = "Central Topic"

[measure]
# Character width as a fraction of the font size
# char_width = 0.6
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert_eq!(settings.layout, Spacing::default());
        assert_eq!(settings.editor.root_title, DEFAULT_ROOT_TITLE);
        assert!(!settings.editor.readonly);
    }

    #[test]
    fn given_zero_max_width_when_validating_then_rejected() {
        let mut settings = Settings::default();
        settings.layout.max_topic_width = 0.0;
        let err = settings.validate().expect_err("zero width is invalid");
        assert!(err.to_string().contains("max_topic_width"));
    }

    #[test]
    fn given_template_when_parsed_then_equals_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_defaults_when_serialized_then_roundtrips() {
        let settings = Settings::default();
        let rendered = settings.to_toml().expect("serialize");
        let parsed: Settings = toml::from_str(&rendered).expect("parse");
        assert_eq!(parsed, settings);
    }
}
