//! Cells command implementation.
//!
//! Partitions a document and prints one line per cell, optionally writing
//! a JSON cell report.

use super::models::CellsArgs;
use super::utils::load_partition;
use crate::output::{write_cell_report, CellReport};
use anyhow::{Context, Result};
use log::info;

/// Execute the cells command
///
/// **Public** - main entry point called from main.rs
pub fn execute_cells(args: CellsArgs) -> Result<()> {
    let (doc, flavor, cells) = load_partition(&args.partition)?;

    info!("{} cells in {}", cells.len(), args.partition.file.display());

    for cell in &cells {
        match cell.code {
            Some(code) => println!("cell {:>3}  {:<12}  code {}", cell.id, cell.range.to_string(), code),
            None => println!("cell {:>3}  {:<12}  (no code)", cell.id, cell.range.to_string()),
        }
    }

    if let Some(path) = &args.output_json {
        let report = CellReport::new(args.partition.file.display().to_string(), flavor, &doc, &cells);
        write_cell_report(&report, path).context("Failed to write cell report")?;
        info!("✓ Cell report written to: {}", path.display());
    }

    Ok(())
}

/// Validate cells arguments
///
/// **Public** - can be called before execute_cells for early validation
pub fn validate_cells_args(args: &CellsArgs) -> Result<()> {
    if args.partition.file.as_os_str().is_empty() {
        anyhow::bail!("Document path cannot be empty");
    }

    if args.partition.delimiters.iter().any(|d| d.is_empty()) {
        anyhow::bail!("Delimiter patterns cannot be empty");
    }

    Ok(())
}
