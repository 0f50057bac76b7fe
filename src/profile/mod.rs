//! Profiler sample data.
//!
//! This module handles:
//! - The JSON shape of per-thread sample trees
//! - Frame category flags
//! - Flattening trees into index-addressed arenas for the renderer

pub mod flags;
pub mod schema;
pub mod tree;

// Re-export main types
pub use flags::FrameFlags;
pub use schema::{NodeMeta, ProfileData, SampleNode};
pub use tree::{FlatNode, NodeId, SampleTree, ThreadProfiles};
