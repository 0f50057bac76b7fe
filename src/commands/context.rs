//! Context command implementation.
//!
//! Resolves the cells under a set of selections and where the
//! previous/next cell navigation would move the cursor.

use super::models::ContextArgs;
use super::utils::load_partition;
use crate::cells::{compute_cell_context, navigation_target, next_cell, previous_cell, Cell};
use anyhow::Result;
use log::debug;

/// Execute the context command
///
/// **Public** - main entry point called from main.rs
pub fn execute_context(args: ContextArgs) -> Result<()> {
    let (_, _, cells) = load_partition(&args.partition)?;
    let ctx = compute_cell_context(&cells, &args.selections);

    debug!("Resolved context for {} selections", args.selections.len());

    println!("inf:      {}", describe(ctx.inf));
    println!("current:  {:?}", ctx.current_ids());
    println!("sup:      {}", describe(ctx.sup));

    let target = |cell: Option<&Cell>| {
        cell.map_or_else(|| "-".to_string(), |c| format!("{} (cell {})", navigation_target(c), c.id))
    };
    println!("previous: {}", target(previous_cell(&cells, &ctx)));
    println!("next:     {}", target(next_cell(&cells, &ctx)));

    Ok(())
}

fn describe(cell: Option<&Cell>) -> String {
    match cell {
        Some(cell) => format!("cell {} {}", cell.id, cell.range),
        None => "-".to_string(),
    }
}

/// Validate context arguments
///
/// **Public** - can be called before execute_context for early validation
pub fn validate_context_args(args: &ContextArgs) -> Result<()> {
    if args.partition.file.as_os_str().is_empty() {
        anyhow::bail!("Document path cannot be empty");
    }

    if args.selections.is_empty() {
        anyhow::bail!("At least one --selection is required");
    }

    Ok(())
}
