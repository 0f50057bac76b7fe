//! cellflame
//!
//! Code-cell partitioning and interactive flame graph rendering for
//! REPL-driven editors.
//!
//! This crate provides the core implementation for the
//! `cellflame` CLI tool:
//! - [`cells`] splits documents into executable cells and resolves which
//!   cells a set of cursor selections touches
//! - [`flamegraph`] lays out, colors and hit-tests profiler sample trees
//!
//! ## Getting Started
//!
//! ```bash
//! cellflame cells script.jl
//! cellflame flame profile.json --output flame.svg
//! ```

pub mod cells;
pub mod commands;
pub mod document;
pub mod flamegraph;
pub mod output;
pub mod profile;
pub mod utils;
