//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod cells;
pub mod context;
pub mod flame;
pub mod models;
pub mod run;
pub mod threads;
pub mod utils;

// Re-export main command functions
pub use cells::{execute_cells, validate_cells_args};
pub use context::{execute_context, validate_context_args};
pub use flame::{execute_flame, validate_flame_args};
pub use models::{CellsArgs, ContextArgs, FlameArgs, PartitionArgs, RunArgs};
pub use run::{execute_run, EchoDispatcher};
pub use threads::list_threads;
pub use utils::display_version;
