//! Run command implementation.
//!
//! Resolves a run command against the selections and hands the resulting
//! chunks to a dispatcher that prints them, the way an editor would send
//! them to a REPL.

use super::models::RunArgs;
use super::utils::load_partition;
use crate::cells::{compute_cell_context, plan_command, run_batch, CodeChunk, DispatchMode, Dispatcher};
use crate::utils::error::DispatchError;
use anyhow::Result;
use log::info;
use std::io::Write;

/// Dispatcher that writes each chunk to an output stream
pub struct EchoDispatcher<W: Write> {
    out: W,
}

impl<W: Write> EchoDispatcher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Dispatcher for EchoDispatcher<W> {
    fn evaluate(&mut self, chunk: &CodeChunk) -> Result<(), DispatchError> {
        writeln!(self.out, "# cell {} @ {}", chunk.cell_id, chunk.range)
            .and_then(|_| writeln!(self.out, "{}", chunk.code.trim_end()))
            .map_err(|e| DispatchError::EvaluationFailed {
                cell_id: chunk.cell_id,
                message: e.to_string(),
            })
    }
}

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
pub fn execute_run(args: RunArgs) -> Result<()> {
    let (doc, _, cells) = load_partition(&args.context.partition)?;
    let ctx = compute_cell_context(&cells, &args.context.selections);
    let plan = plan_command(&doc, &cells, &ctx, args.command);

    info!("{:?}: {} cells to run", args.command, plan.chunks.len());

    let mode = if args.queued {
        DispatchMode::Queued
    } else {
        DispatchMode::Sequential
    };

    let mut dispatcher = EchoDispatcher::new(std::io::stdout().lock());
    let completed = run_batch(&mut dispatcher, &plan.chunks, mode);

    if let Some(pos) = plan.move_to {
        println!("# move cursor to {}", pos);
    }

    if !completed && !plan.chunks.is_empty() {
        anyhow::bail!("Cell execution was aborted");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Range;

    #[test]
    fn test_echo_dispatcher() {
        let mut dispatcher = EchoDispatcher::new(Vec::new());
        let chunks = vec![CodeChunk {
            cell_id: 2,
            range: Range::default(),
            code: "y = 2\n".to_string(),
        }];

        assert!(run_batch(&mut dispatcher, &chunks, DispatchMode::Sequential));

        let out = String::from_utf8(dispatcher.into_inner()).unwrap();
        assert_eq!(out, "# cell 2 @ [0:0 - 0:0]\ny = 2\n");
    }
}
