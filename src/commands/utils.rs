use super::models::PartitionArgs;
use crate::cells::{Cell, DelimiterSet, DocumentFlavor, Partitioner};
use crate::document::SourceText;
use crate::utils::config::{Settings, SCHEMA_VERSION};
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Settings from `path`, or the defaults
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Read a document and partition it into cells
pub fn load_partition(args: &PartitionArgs) -> Result<(SourceText, DocumentFlavor, Vec<Cell>)> {
    let settings = load_settings(args.config.as_deref())?;

    let mut partitioner =
        Partitioner::from_settings(&settings).context("Invalid cell patterns in settings")?;
    if !args.delimiters.is_empty() {
        partitioner.delimiters =
            DelimiterSet::new(&args.delimiters).context("Invalid --delimiter pattern")?;
    }

    let flavor = if args.markdown {
        DocumentFlavor::Markdown
    } else {
        DocumentFlavor::from_path(&args.file)
    };

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let doc = SourceText::new(text);

    let cells = partitioner
        .partition(&doc, flavor)
        .context("Failed to partition document")?;

    debug!("{:?} document with {} cells", flavor, cells.len());

    Ok((doc, flavor, cells))
}

/// Display version information
pub fn display_version() {
    println!("cellflame v{}", env!("CARGO_PKG_VERSION"));
    println!("Cell Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Code cells and flame graphs for REPL-driven editing.");
}
