//! Studio settings
//!
//! Timing, stylesheet policy and export options, loadable from a TOML file.
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::ExportOptions;
use crate::stylesheet::{SheetSource, StyleMode};

/// Default location of the external base sheet
pub const DEFAULT_SHEET_SOURCE: &str = "css/popup.css";

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for one studio session
#[derive(Debug, Clone, PartialEq)]
pub struct StudioSettings {
    /// Quiet period before a configuration edit is applied
    pub config_debounce: Duration,
    /// Quiet period before a stylesheet edit is applied
    pub stylesheet_debounce: Duration,
    /// Template selected when the session starts
    pub start_template: usize,
    /// Stylesheet policy of the built-in catalog
    pub style_mode: StyleMode,
    /// Where the external base sheet is loaded from
    pub sheet_source: SheetSource,
    /// Code output options
    pub export: ExportOptions,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            config_debounce: Duration::from_millis(300),
            stylesheet_debounce: Duration::from_millis(200),
            start_template: 0,
            style_mode: StyleMode::default(),
            sheet_source: SheetSource::parse(DEFAULT_SHEET_SOURCE),
            export: ExportOptions::default(),
        }
    }
}

/// TOML structure for deserializing settings
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default)]
    session: TomlSession,
    #[serde(default)]
    stylesheet: TomlStylesheet,
    #[serde(default)]
    export: TomlExport,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSession {
    config_debounce_ms: Option<u64>,
    stylesheet_debounce_ms: Option<u64>,
    start_template: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlStylesheet {
    mode: Option<StyleMode>,
    source: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlExport {
    include_font_notice: Option<bool>,
    font_url: Option<String>,
}

impl StudioSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let mut settings = Self::default();

        if let Some(ms) = parsed.session.config_debounce_ms {
            settings.config_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = parsed.session.stylesheet_debounce_ms {
            settings.stylesheet_debounce = Duration::from_millis(ms);
        }
        if let Some(index) = parsed.session.start_template {
            settings.start_template = index;
        }
        if let Some(mode) = parsed.stylesheet.mode {
            settings.style_mode = mode;
        }
        if let Some(source) = parsed.stylesheet.source {
            settings.sheet_source = SheetSource::parse(&source);
        }
        if let Some(include) = parsed.export.include_font_notice {
            settings.export.include_font_notice = include;
        }
        if let Some(url) = parsed.export.font_url {
            settings.export.font_url = url;
        }

        Ok(settings)
    }

    /// Set the configuration debounce
    pub fn with_config_debounce(mut self, delay: Duration) -> Self {
        self.config_debounce = delay;
        self
    }

    /// Set the stylesheet debounce
    pub fn with_stylesheet_debounce(mut self, delay: Duration) -> Self {
        self.stylesheet_debounce = delay;
        self
    }

    /// Set the template selected at startup
    pub fn with_start_template(mut self, index: usize) -> Self {
        self.start_template = index;
        self
    }

    /// Set the stylesheet policy
    pub fn with_style_mode(mut self, mode: StyleMode) -> Self {
        self.style_mode = mode;
        self
    }

    /// Set the external sheet location
    pub fn with_sheet_source(mut self, source: SheetSource) -> Self {
        self.sheet_source = source;
        self
    }

    /// Set the code output options
    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = StudioSettings::default();
        assert_eq!(settings.config_debounce, Duration::from_millis(300));
        assert_eq!(settings.stylesheet_debounce, Duration::from_millis(200));
        assert_eq!(settings.start_template, 0);
        assert_eq!(settings.style_mode, StyleMode::Editable);
        assert_eq!(settings.sheet_source, SheetSource::parse("css/popup.css"));
        assert!(settings.export.include_font_notice);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(StudioSettings::from_str("").unwrap(), StudioSettings::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[session]
config_debounce_ms = 500
stylesheet_debounce_ms = 100
start_template = 2

[stylesheet]
mode = "inline"
source = "https://cdn.example.com/popup.css"

[export]
include_font_notice = false
font_url = "https://fonts.example/f.css"
"#;
        let settings = StudioSettings::from_str(toml_str).expect("Should parse");
        assert_eq!(settings.config_debounce, Duration::from_millis(500));
        assert_eq!(settings.stylesheet_debounce, Duration::from_millis(100));
        assert_eq!(settings.start_template, 2);
        assert_eq!(settings.style_mode, StyleMode::Inline);
        assert!(matches!(settings.sheet_source, SheetSource::Remote(_)));
        assert!(!settings.export.include_font_notice);
        assert_eq!(settings.export.font_url, "https://fonts.example/f.css");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = StudioSettings::from_str("[session]\nconfig_debounce_ms = 50\n").unwrap();
        assert_eq!(settings.config_debounce, Duration::from_millis(50));
        assert_eq!(settings.stylesheet_debounce, Duration::from_millis(200));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(StudioSettings::from_str("this is not valid toml {{{{").is_err());
        assert!(StudioSettings::from_str("[stylesheet]\nmode = \"fancy\"\n").is_err());
        assert!(StudioSettings::from_str("[session]\nunknown = 1\n").is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let settings = StudioSettings::new()
            .with_config_debounce(Duration::from_millis(10))
            .with_style_mode(StyleMode::External)
            .with_start_template(1);
        assert_eq!(settings.config_debounce, Duration::from_millis(10));
        assert_eq!(settings.style_mode, StyleMode::External);
        assert_eq!(settings.start_template, 1);
    }
}
