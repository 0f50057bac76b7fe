//! JSON readers and writers.
//!
//! Cell reports describe a document's partition for editor integrations.
//! Profiles are the per-thread sample trees the flame graph renders.

use super::prepare_output_path;
use crate::cells::{Cell, DocumentFlavor};
use crate::document::{Range, TextDocument};
use crate::profile::ProfileData;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::{OutputError, ProfileError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Partition of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub version: String,
    pub source: String,
    pub flavor: String,
    pub cells: Vec<CellEntry>,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEntry {
    pub id: usize,
    pub range: Range,
    pub code_range: Option<Range>,
    pub code: String,
}

impl CellReport {
    pub fn new<D: TextDocument + ?Sized>(
        source: impl Into<String>,
        flavor: DocumentFlavor,
        doc: &D,
        cells: &[Cell],
    ) -> Self {
        let cells = cells
            .iter()
            .map(|cell| CellEntry {
                id: cell.id,
                range: cell.range,
                code_range: cell.code,
                code: cell.code_text(doc).to_string(),
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            flavor: match flavor {
                DocumentFlavor::Script => "script",
                DocumentFlavor::Markdown => "markdown",
            }
            .to_string(),
            cells,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn executable_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.code_range.is_some()).count()
    }
}

/// Write a cell report as pretty-printed JSON
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_cell_report(report: &CellReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing cell report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Cell report written ({} cells, {} bytes)",
        report.cells.len(),
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a cell report back, e.g. for validation
pub fn read_cell_report(input_path: impl AsRef<Path>) -> Result<CellReport, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading cell report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(report)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read profiler samples from a JSON file
///
/// # Errors
/// * `ProfileError::IoError` - File read error
/// * `ProfileError::JsonError` - Not a thread → sample tree object
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<ProfileData, ProfileError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let raw = std::fs::read_to_string(input_path)?;
    let data = parse_profile(&raw)?;

    debug!("Profile loaded: {} threads", data.len());

    Ok(data)
}

/// Parse profiler samples from a JSON string.
///
/// Call stacks nest one object per frame, so the parser's recursion limit
/// is lifted.
pub fn parse_profile(json: &str) -> Result<ProfileData, ProfileError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let data = ProfileData::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(data)
}
