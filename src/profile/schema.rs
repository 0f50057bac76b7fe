//! JSON schema of profiler sample data.
//!
//! A profile maps thread names to a sample tree:
//!
//! ```json
//! { "all": { "meta": { "func": "main", "file": "main.jl", "line": 1, "count": 10, "flags": 0 },
//!            "children": [ ... ] } }
//! ```

use super::flags::FrameFlags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thread name -> root sample node
pub type ProfileData = BTreeMap<String, SampleNode>;

/// A frame of the sampled call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleNode {
    pub meta: NodeMeta,

    #[serde(default)]
    pub children: Vec<SampleNode>,
}

/// Frame metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Function name
    #[serde(default)]
    pub func: String,

    /// Source file
    #[serde(default)]
    pub file: String,

    /// Source line
    #[serde(default)]
    pub line: i64,

    /// Samples attributed to this frame and everything it called
    #[serde(default)]
    pub count: u64,

    /// Category bitmask, see [`FrameFlags`]
    #[serde(default)]
    pub flags: u8,
}

impl NodeMeta {
    pub fn frame_flags(&self) -> FrameFlags {
        FrameFlags::from_bits_retain(self.flags)
    }

    /// `file:line` as shown in tooltips
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}
