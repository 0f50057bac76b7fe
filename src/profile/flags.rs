//! Per-frame category bits.

use bitflags::bitflags;

bitflags! {
    /// Frame categories reported by the profiler. The bit values are part
    /// of the data format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// Call went through runtime dispatch
        const DISPATCH = 0x01;
        /// Garbage collection
        const GC = 0x02;
        /// Compilation
        const COMPILATION = 0x08;
        /// Native or foreign (C) frame
        const NATIVE = 0x10;
    }
}

impl FrameFlags {
    /// Human readable names of the set categories
    pub fn labels(self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.contains(Self::DISPATCH) {
            labels.push("runtime dispatch");
        }
        if self.contains(Self::GC) {
            labels.push("garbage collection");
        }
        if self.contains(Self::COMPILATION) {
            labels.push("compilation");
        }
        if self.contains(Self::NATIVE) {
            labels.push("native code");
        }
        labels
    }
}
