//! Configuration and constants for the library and CLI.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current cell report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Lines starting a new cell: `##` (not `###`), `#%%`/`# %%`, `#+`, `#-`
pub const DEFAULT_CELL_DELIMITERS: &[&str] = &[r"^##(?!#)", r"^#(\s?)%%", r"^#\+", r"^#-"];

// Fenced code blocks in weave/quarto style markdown documents
pub const DEFAULT_FENCE_START: &str = r"^```\s*\{?julia";
pub const DEFAULT_FENCE_END: &str = r"^```(?!\w)";

/// Padding around flame graph box contents, in device pixels
pub const BOX_PADDING: f64 = 2.0;

/// Minimum usable text width before a label is drawn at all
pub const TEXT_THRESHOLD: f64 = 2.0 * BOX_PADDING;

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Thread key preferred when a profile is loaded
pub const ALL_THREADS_KEY: &str = "all";

/// User settings, loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Regular expressions matching lines that start a new cell
    pub cell_delimiters: Vec<String>,

    /// Fence patterns for markdown-flavored documents
    pub markdown_fences: FenceSettings,

    /// Flame graph canvas settings
    pub flame: FlameSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_delimiters: DEFAULT_CELL_DELIMITERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            markdown_fences: FenceSettings::default(),
            flame: FlameSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FenceSettings {
    pub start: String,
    pub end: String,
}

impl Default for FenceSettings {
    fn default() -> Self {
        Self {
            start: DEFAULT_FENCE_START.to_string(),
            end: DEFAULT_FENCE_END.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlameSettings {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub font_size: f64,
}

impl Default for FlameSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            pixel_ratio: 1.0,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}
