//! Code cell model.
//!
//! This module handles:
//! - Partitioning a document into cells by delimiter lines or code fences
//! - Resolving which cells a set of cursor selections touches
//! - Moving to the previous/next executable cell
//! - Batching cell code for an external execution backend
//!
//! Partitions are recomputed on demand from the live document; nothing is
//! cached between queries.

pub mod context;
pub mod execution;
pub mod navigation;
pub mod partition;

// Re-export main types and functions
pub use context::{compute_cell_context, find_cell, CellContext};
pub use execution::{
    cells_for_command, code_chunks, plan_command, run_batch, CellCommand, CodeChunk, DispatchMode,
    Dispatcher, ExecutionPlan, Submission,
};
pub use navigation::{navigation_target, next_cell, previous_cell};
pub use partition::{
    compute_markdown_partition, compute_partition, Cell, DelimiterSet, DocumentFlavor, FenceSet,
    Partitioner,
};
