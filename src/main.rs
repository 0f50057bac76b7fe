//! cellflame CLI
//!
//! Splits source documents into code cells and renders profiler samples
//! as flame graphs.

use anyhow::Result;
use cellflame::cells::CellCommand;
use cellflame::commands::{
    display_version, execute_cells, execute_context, execute_flame, execute_run, list_threads,
    validate_cells_args, validate_context_args, validate_flame_args, CellsArgs, ContextArgs,
    FlameArgs, PartitionArgs, RunArgs,
};
use cellflame::document::Selection;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

/// cellflame - code cells and flame graphs
#[derive(Parser, Debug)]
#[command(name = "cellflame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Document and partitioning options shared by the cell commands
#[derive(Args, Debug)]
struct DocumentOpts {
    /// Source document
    file: PathBuf,

    /// Cell delimiter pattern (repeatable, replaces the configured set)
    #[arg(short, long = "delimiter")]
    delimiters: Vec<String>,

    /// Treat the document as markdown with fenced code blocks
    #[arg(long)]
    markdown: bool,

    /// Settings JSON file
    #[arg(short, long, env = "CELLFLAME_CONFIG")]
    config: Option<PathBuf>,
}

impl From<DocumentOpts> for PartitionArgs {
    fn from(opts: DocumentOpts) -> Self {
        Self {
            file: opts.file,
            delimiters: opts.delimiters,
            markdown: opts.markdown,
            config: opts.config,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum RunTarget {
    /// Cells under the selections
    Current,
    /// Cells under the selections, then move to the next cell
    Move,
    /// From the first selected cell to the end
    Below,
    /// Every cell above the selections
    Above,
}

impl From<RunTarget> for CellCommand {
    fn from(target: RunTarget) -> Self {
        match target {
            RunTarget::Current => CellCommand::Current,
            RunTarget::Move => CellCommand::CurrentAndMove,
            RunTarget::Below => CellCommand::CurrentAndBelow,
            RunTarget::Above => CellCommand::Above,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the cells of a document
    Cells {
        #[command(flatten)]
        document: DocumentOpts,

        /// Output path for a JSON cell report
        #[arg(short, long)]
        json: Option<PathBuf>,
    },

    /// Show the cells around one or more selections
    Context {
        #[command(flatten)]
        document: DocumentOpts,

        /// Selection as LINE:COL or LINE:COL-LINE:COL (zero-based, repeatable)
        #[arg(short, long = "selection", required = true)]
        selections: Vec<Selection>,
    },

    /// Print the code a run command would send to the REPL
    Run {
        #[command(flatten)]
        document: DocumentOpts,

        /// Selection as LINE:COL or LINE:COL-LINE:COL (zero-based, repeatable)
        #[arg(short, long = "selection", required = true)]
        selections: Vec<Selection>,

        /// Which cells to run
        #[arg(long, value_enum, default_value = "current")]
        target: RunTarget,

        /// Submit through the queue instead of one cell at a time
        #[arg(long)]
        queued: bool,
    },

    /// Render a profile as an SVG flame graph
    Flame {
        /// Profile JSON file
        profile: PathBuf,

        /// Output path for the SVG
        #[arg(short, long, default_value = "flame.svg")]
        output: PathBuf,

        /// Thread to render (defaults to "all")
        #[arg(short, long)]
        thread: Option<String>,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<f64>,

        /// Pixels to scroll down
        #[arg(long, default_value = "0")]
        scroll: f64,

        /// Zoom into the node at this child-index path, e.g. 0,2
        #[arg(long, value_delimiter = ',')]
        zoom: Vec<usize>,

        /// Flame graph title
        #[arg(long)]
        title: Option<String>,

        /// Settings JSON file
        #[arg(short, long, env = "CELLFLAME_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List the threads of a profile
    Threads {
        /// Profile JSON file
        profile: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Cells { document, json } => {
            let args = CellsArgs {
                partition: document.into(),
                output_json: json,
            };
            validate_cells_args(&args)?;
            execute_cells(args)?;
        }

        Commands::Context {
            document,
            selections,
        } => {
            let args = ContextArgs {
                partition: document.into(),
                selections,
            };
            validate_context_args(&args)?;
            execute_context(args)?;
        }

        Commands::Run {
            document,
            selections,
            target,
            queued,
        } => {
            let context = ContextArgs {
                partition: document.into(),
                selections,
            };
            validate_context_args(&context)?;
            execute_run(RunArgs {
                context,
                command: target.into(),
                queued,
            })?;
        }

        Commands::Flame {
            profile,
            output,
            thread,
            width,
            height,
            scroll,
            zoom,
            title,
            config,
        } => {
            let args = FlameArgs {
                profile,
                output_svg: output,
                thread,
                width,
                height,
                scroll,
                zoom,
                title,
                config,
            };
            validate_flame_args(&args)?;
            execute_flame(args)?;
        }

        Commands::Threads { profile } => {
            list_threads(&profile)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
