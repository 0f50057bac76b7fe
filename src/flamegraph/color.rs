//! Deterministic node coloring.
//!
//! Every node gets a base color from its category which is then jittered
//! by a PRNG seeded with a hash of the node's source location, so the same
//! frame looks the same on every redraw and every run.

use crate::profile::{FrameFlags, NodeMeta};
use std::fmt;

/// An RGBA color; renders as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Scale the color channels, keeping alpha
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Fill, outline and label colors of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeColors {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub text: Rgba,
}

/// Base color and total jitter range of a node category
#[derive(Debug, Clone, Copy, PartialEq)]
struct Palette {
    rgb: (u8, u8, u8),
    range: f64,
}

const DISPATCH: Palette = Palette { rgb: (204, 102, 102), range: 20.0 };
const GC: Palette = Palette { rgb: (204, 153, 68), range: 20.0 };
const COMPILATION: Palette = Palette { rgb: (100, 100, 100), range: 60.0 };
const DEFAULT: Palette = Palette { rgb: (64, 99, 221), range: 40.0 };

const NATIVE_ALPHA: f64 = 0.5;
const MIN_TEXT_ALPHA: f64 = 0.6;
const STROKE_FACTOR: f64 = 0.8;

impl Palette {
    fn for_flags(flags: FrameFlags) -> Self {
        if flags.contains(FrameFlags::DISPATCH) {
            DISPATCH
        } else if flags.contains(FrameFlags::GC) {
            GC
        } else if flags.contains(FrameFlags::COMPILATION) {
            COMPILATION
        } else {
            DEFAULT
        }
    }
}

/// 32-bit string hash of `file` followed by `line`.
///
/// Folds UTF-16 code units with `h = h * 31 + c` in wrapping arithmetic.
pub fn node_hash(file: &str, line: i64) -> u32 {
    let key = format!("{}{}", file, line);
    let hash = key
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit)));
    hash as u32
}

/// Mulberry32 generator; reproducible floats in `[0, 1)` from a seed.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

fn jitter(base: u8, delta: f64) -> u8 {
    (f64::from(base) + delta).round().clamp(0.0, 255.0) as u8
}

/// Colors for a node, a pure function of its location and flags.
pub fn node_colors(meta: &NodeMeta) -> NodeColors {
    let flags = meta.frame_flags();
    let palette = Palette::for_flags(flags);
    let mut rng = Mulberry32::new(node_hash(&meta.file, meta.line));

    let (r, g, b) = palette.rgb;
    let (r, g, b) = if r == g && g == b {
        // grays stay gray
        let delta = (rng.next_f64() - 0.5) * palette.range;
        let v = jitter(r, delta);
        (v, v, v)
    } else {
        (
            jitter(r, (rng.next_f64() - 0.5) * palette.range),
            jitter(g, (rng.next_f64() - 0.5) * palette.range),
            jitter(b, (rng.next_f64() - 0.5) * palette.range),
        )
    };

    let alpha = if flags.contains(FrameFlags::NATIVE) { NATIVE_ALPHA } else { 1.0 };
    let fill = Rgba::new(r, g, b, alpha);

    NodeColors {
        fill,
        stroke: fill.scaled(STROKE_FACTOR),
        text: Rgba::new(255, 255, 255, alpha.max(MIN_TEXT_ALPHA)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(file: &str, line: i64, flags: u8) -> NodeMeta {
        NodeMeta {
            func: "f".to_string(),
            file: file.to_string(),
            line,
            count: 1,
            flags,
        }
    }

    #[test]
    fn test_hash_matches_string_fold() {
        assert_eq!(node_hash("", 1), 49);
        assert_eq!(node_hash("a", 1), 97 * 31 + 49);
        assert_eq!(node_hash("a.jl", 12), 2_822_772_816);
        assert_eq!(node_hash("src/solver.jl", 7), node_hash("src/solver.jl", 7));
        assert_ne!(node_hash("src/solver.jl", 7), node_hash("src/solver.jl", 8));
    }

    #[test]
    fn test_prng_is_reproducible() {
        let mut a = Mulberry32::new(42);
        let mut b = Mulberry32::new(42);
        for _ in 0..100 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
        assert_ne!(Mulberry32::new(1).next_f64(), Mulberry32::new(2).next_f64());
    }

    #[test]
    fn test_colors_are_deterministic() {
        let m = meta("src/solver.jl", 118, 0);
        let first = node_colors(&m);
        let second = node_colors(&m);
        assert_eq!(first.fill.to_string(), second.fill.to_string());
        assert_eq!(first.stroke.to_string(), second.stroke.to_string());
    }

    #[test]
    fn test_compilation_stays_gray() {
        for line in 0..50 {
            let c = node_colors(&meta("inference.jl", line, 0x08)).fill;
            assert_eq!(c.r, c.g);
            assert_eq!(c.g, c.b);
            assert!((70..=130).contains(&c.r));
        }
    }

    #[test]
    fn test_jitter_stays_in_range() {
        for line in 0..50 {
            let c = node_colors(&meta("gc.jl", line, 0x02)).fill;
            assert!((194..=214).contains(&c.r), "{}", c);
            assert!((143..=163).contains(&c.g), "{}", c);
            assert!((58..=78).contains(&c.b), "{}", c);
        }
    }

    #[test]
    fn test_native_frames_are_translucent() {
        let colors = node_colors(&meta("libc.so", 0, 0x10));
        assert_eq!(colors.fill.a, 0.5);
        assert_eq!(colors.text.a, 0.6);
        assert_eq!(node_colors(&meta("a.jl", 1, 0)).text.a, 1.0);
    }

    #[test]
    fn test_stroke_is_darker_fill() {
        let colors = node_colors(&meta("a.jl", 3, 0x01));
        assert_eq!(colors.stroke, colors.fill.scaled(0.8));
        assert!(colors.stroke.r < colors.fill.r);
    }

    #[test]
    fn test_rgba_string() {
        assert_eq!(Rgba::new(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Rgba::new(255, 255, 255, 1.0).to_string(), "rgba(255, 255, 255, 1)");
    }
}
