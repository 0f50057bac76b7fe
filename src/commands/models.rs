use crate::cells::CellCommand;
use crate::document::Selection;
use crate::utils::config::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use std::path::PathBuf;

/// How a document is split into cells
///
/// **Public** - shared by the cell commands
#[derive(Debug, Clone, Default)]
pub struct PartitionArgs {
    /// Source document
    pub file: PathBuf,

    /// Delimiter patterns overriding the configured ones
    pub delimiters: Vec<String>,

    /// Force markdown fence partitioning regardless of the file extension
    pub markdown: bool,

    /// Settings file
    pub config: Option<PathBuf>,
}

/// Arguments for the cells command
#[derive(Debug, Clone, Default)]
pub struct CellsArgs {
    pub partition: PartitionArgs,

    /// Output path for a JSON cell report (optional)
    pub output_json: Option<PathBuf>,
}

/// Arguments for the context command
#[derive(Debug, Clone, Default)]
pub struct ContextArgs {
    pub partition: PartitionArgs,

    /// Cursor selections; at least one
    pub selections: Vec<Selection>,
}

/// Arguments for the run command
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub context: ContextArgs,

    /// Which cells to send
    pub command: CellCommand,

    /// Push everything onto the queue instead of waiting for each cell
    pub queued: bool,
}

/// Arguments for the flame command
#[derive(Debug, Clone)]
pub struct FlameArgs {
    /// Profile JSON file
    pub profile: PathBuf,

    /// Output path for the SVG
    pub output_svg: PathBuf,

    /// Thread to render (None = default thread)
    pub thread: Option<String>,

    /// Canvas size in CSS pixels (None = configured size)
    pub width: Option<f64>,
    pub height: Option<f64>,

    /// Pixels to scroll down before rendering
    pub scroll: f64,

    /// Child indices from the root of the node to zoom into
    pub zoom: Vec<usize>,

    /// SVG title
    pub title: Option<String>,

    /// Settings file
    pub config: Option<PathBuf>,
}

impl Default for FlameArgs {
    fn default() -> Self {
        Self {
            profile: PathBuf::from("profile.json"),
            output_svg: PathBuf::from("flame.svg"),
            thread: None,
            width: Some(DEFAULT_CANVAS_WIDTH),
            height: Some(DEFAULT_CANVAS_HEIGHT),
            scroll: 0.0,
            zoom: Vec::new(),
            title: None,
            config: None,
        }
    }
}
