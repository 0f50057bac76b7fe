//! Hand resolved cells over to an execution backend.
//!
//! The model never runs code itself. It turns cells into ordered
//! [`CodeChunk`]s and feeds them to a [`Dispatcher`], either waiting for each
//! evaluation in turn or pushing them onto the backend's queue.

use super::context::CellContext;
use super::navigation::{navigation_target, next_cell};
use super::partition::Cell;
use crate::document::{Position, Range, TextDocument};
use crate::utils::error::DispatchError;
use log::{debug, info, warn};

/// Which cells a run command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCommand {
    /// Cells under the selections
    Current,
    /// Cells under the selections, then move to the next cell
    CurrentAndMove,
    /// From the first selected cell to the end of the document
    CurrentAndBelow,
    /// Every cell above the selections
    Above,
}

/// Code of one cell, ready for evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChunk {
    pub cell_id: usize,
    pub range: Range,
    pub code: String,
}

/// How a batch is handed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Evaluate one chunk at a time, stop at the first failure
    #[default]
    Sequential,
    /// Push chunks onto the backend queue, stop once the queue drains
    Queued,
}

/// Outcome of pushing a chunk onto the backend queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Accepted for evaluation
    Queued,
    /// The queue was drained (failure or interrupt) before the chunk got in
    Drained,
}

/// External execution backend.
pub trait Dispatcher {
    /// Evaluate a chunk and wait for its result.
    fn evaluate(&mut self, chunk: &CodeChunk) -> Result<(), DispatchError>;

    /// Push a chunk onto the evaluation queue.
    fn enqueue(&mut self, chunk: &CodeChunk) -> Submission {
        match self.evaluate(chunk) {
            Ok(()) => Submission::Queued,
            Err(_) => Submission::Drained,
        }
    }

    /// Show that a chunk is waiting to run
    fn mark_pending(&mut self, _chunk: &CodeChunk) {}

    /// Remove the waiting marker of a chunk
    fn clear_pending(&mut self, _chunk: &CodeChunk) {}
}

/// Cells targeted by `command`, in document order.
pub fn cells_for_command<'a>(
    cells: &'a [Cell],
    ctx: &CellContext<'a>,
    command: CellCommand,
) -> Vec<&'a Cell> {
    match command {
        CellCommand::Current | CellCommand::CurrentAndMove => ctx.current.clone(),
        CellCommand::CurrentAndBelow => {
            let Some(first) = ctx.current.first().copied().or(ctx.sup) else {
                return Vec::new();
            };
            cells[first.id..].iter().collect()
        }
        CellCommand::Above => {
            let end = match (ctx.current.first(), ctx.inf) {
                (Some(first), _) => first.id,
                (None, Some(inf)) => inf.id + 1,
                (None, None) => 0,
            };
            cells[..end.min(cells.len())].iter().collect()
        }
    }
}

/// Build evaluation chunks, skipping cells without code.
pub fn code_chunks<D: TextDocument + ?Sized>(doc: &D, cells: &[&Cell]) -> Vec<CodeChunk> {
    cells
        .iter()
        .filter_map(|cell| {
            let range = cell.code?;
            Some(CodeChunk {
                cell_id: cell.id,
                range,
                code: cell.code_text(doc).to_string(),
            })
        })
        .collect()
}

/// Chunks to run for a command plus where the cursor goes afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub chunks: Vec<CodeChunk>,
    pub move_to: Option<Position>,
}

pub fn plan_command<'a, D: TextDocument + ?Sized>(
    doc: &D,
    cells: &'a [Cell],
    ctx: &CellContext<'a>,
    command: CellCommand,
) -> ExecutionPlan {
    let targets = cells_for_command(cells, ctx, command);
    let move_to = match command {
        CellCommand::CurrentAndMove => next_cell(cells, ctx).map(navigation_target),
        _ => None,
    };

    ExecutionPlan {
        chunks: code_chunks(doc, &targets),
        move_to,
    }
}

/// Run a batch of chunks, returning whether every chunk was accepted.
///
/// Remaining chunks are abandoned after the first failure and their pending
/// markers are removed. An empty batch reports failure.
pub fn run_batch<D: Dispatcher + ?Sized>(
    dispatcher: &mut D,
    chunks: &[CodeChunk],
    mode: DispatchMode,
) -> bool {
    if chunks.is_empty() {
        debug!("Nothing to execute");
        return false;
    }

    for chunk in chunks {
        dispatcher.mark_pending(chunk);
    }

    for (i, chunk) in chunks.iter().enumerate() {
        let abandoned = match mode {
            DispatchMode::Sequential => {
                let result = dispatcher.evaluate(chunk);
                dispatcher.clear_pending(chunk);
                match result {
                    Ok(()) => continue,
                    Err(err) => {
                        warn!("{}", err);
                        &chunks[i + 1..]
                    }
                }
            }
            DispatchMode::Queued => match dispatcher.enqueue(chunk) {
                Submission::Queued => continue,
                Submission::Drained => {
                    warn!("Execution queue drained before cell {} was submitted", chunk.cell_id);
                    &chunks[i..]
                }
            },
        };

        for rest in abandoned {
            dispatcher.clear_pending(rest);
        }
        info!("Aborted batch after {} of {} cells", i, chunks.len());
        return false;
    }

    debug!("Dispatched {} cells", chunks.len());
    true
}
