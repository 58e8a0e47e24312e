//! Editor settings file.
//!
//! Settings are a flat JSON object. Every field is optional; missing fields take their
//! defaults, so `{}` is a valid settings file.
//!
//! ```json
//! {
//!   "highlighter": "tree-cursor",
//!   "tab_size": 4,
//!   "convert_tabs_to_spaces": true,
//!   "colors": { "keyword": "#CC7832" }
//! }
//! ```

use crate::theme::Rgb;
use lineview_core::{
    DEFAULT_BLINK_INTERVAL, DEFAULT_LINE_SCROLL_SPEED, DEFAULT_TAB_SIZE, ViewportConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Which highlighter the editor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HighlighterKind {
    /// Strict tree-sitter highlighter; rejects sources with syntax errors.
    #[serde(rename = "ast")]
    Ast,
    /// Regex tokenizer.
    #[serde(rename = "regex")]
    Regex,
    /// Incremental tree-sitter highlighter that tolerates syntax errors.
    #[default]
    #[serde(rename = "tree-cursor")]
    TreeCursor,
    /// No highlighting; every char is plain.
    #[serde(rename = "none")]
    None,
}

impl HighlighterKind {
    /// Every kind, in documentation order.
    pub const ALL: [HighlighterKind; 4] = [
        HighlighterKind::Ast,
        HighlighterKind::Regex,
        HighlighterKind::TreeCursor,
        HighlighterKind::None,
    ];

    /// Settings-file name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            HighlighterKind::Ast => "ast",
            HighlighterKind::Regex => "regex",
            HighlighterKind::TreeCursor => "tree-cursor",
            HighlighterKind::None => "none",
        }
    }
}

impl fmt::Display for HighlighterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown highlighter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown highlighter `{0}` (expected one of: ast, regex, tree-cursor, none)")]
pub struct UnknownHighlighter(pub String);

impl FromStr for HighlighterKind {
    type Err = UnknownHighlighter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownHighlighter(s.to_string()))
    }
}

/// Errors produced while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid settings JSON.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-facing editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Highlighter selection.
    pub highlighter: HighlighterKind,
    /// Spaces per tab.
    pub tab_size: usize,
    /// Whether the Tab key inserts spaces.
    pub convert_tabs_to_spaces: bool,
    /// Extra pixels between lines.
    pub line_spacing: f64,
    /// Lines scrolled per wheel tick.
    pub line_scroll_speed: f64,
    /// Caret blink half-period in milliseconds.
    pub blink_interval_ms: u64,
    /// Run highlighting on a worker thread instead of the UI thread.
    pub background_highlighting: bool,
    /// Per-tag color overrides, keyed by tag name (`"keyword"`, `"string"`, ...).
    pub colors: BTreeMap<String, Rgb>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            highlighter: HighlighterKind::default(),
            tab_size: DEFAULT_TAB_SIZE,
            convert_tabs_to_spaces: false,
            line_spacing: 0.0,
            line_scroll_speed: DEFAULT_LINE_SCROLL_SPEED,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL.as_millis() as u64,
            background_highlighting: true,
            colors: BTreeMap::new(),
        }
    }
}

impl EditorSettings {
    /// Parse settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            highlighter = %settings.highlighter,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Load settings from `path` if given, falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp values to valid ranges.
    pub fn sanitize(&mut self) {
        self.tab_size = self.tab_size.clamp(1, 16);
        if !self.line_spacing.is_finite() || self.line_spacing < 0.0 {
            self.line_spacing = 0.0;
        }
        if !self.line_scroll_speed.is_finite() || self.line_scroll_speed <= 0.0 {
            self.line_scroll_speed = DEFAULT_LINE_SCROLL_SPEED;
        }
        self.blink_interval_ms = self.blink_interval_ms.max(50);
    }

    /// Viewport config carrying these settings.
    pub fn to_viewport_config(&self) -> ViewportConfig {
        ViewportConfig::new()
            .with_tab_size(self.tab_size)
            .with_tabs_as_spaces(self.convert_tabs_to_spaces)
            .with_line_spacing(self.line_spacing)
            .with_line_scroll_speed(self.line_scroll_speed)
            .with_blink_interval(Duration::from_millis(self.blink_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_defaults() {
        let settings = EditorSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(settings.highlighter, HighlighterKind::TreeCursor);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in HighlighterKind::ALL {
            assert_eq!(kind.as_str().parse::<HighlighterKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert!("treecursor".parse::<HighlighterKind>().is_err());
    }

    #[test]
    fn test_sanitize_clamps() {
        let json = r#"{
            "tab_size": 0,
            "line_spacing": -2,
            "line_scroll_speed": 0,
            "blink_interval_ms": 1
        }"#;
        let settings = EditorSettings::from_json_str(json).unwrap();
        assert_eq!(settings.tab_size, 1);
        assert_eq!(settings.line_spacing, 0.0);
        assert_eq!(settings.line_scroll_speed, DEFAULT_LINE_SCROLL_SPEED);
        assert_eq!(settings.blink_interval_ms, 50);
    }

    #[test]
    fn test_to_viewport_config() {
        let settings = EditorSettings::from_json_str(
            r#"{"tab_size": 2, "convert_tabs_to_spaces": true, "blink_interval_ms": 300}"#,
        )
        .unwrap();
        let config = settings.to_viewport_config();
        assert_eq!(config.tab_size, 2);
        assert!(config.convert_tabs_to_spaces);
        assert_eq!(config.blink_interval, Duration::from_millis(300));
    }
}
