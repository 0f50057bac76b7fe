//! Hover tooltip content and placement.

use crate::profile::NodeMeta;

/// Gap between the pointer and the tooltip, in CSS pixels
const POINTER_OFFSET: f64 = 10.0;

/// Which tooltip edge sits at the anchor point horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Right,
}

/// Which tooltip edge sits at the anchor point vertically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Bottom,
}

/// Positioned tooltip, coordinates in CSS pixels relative to the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Tooltip {
    /// Tooltip for `meta` next to the pointer at (`x`, `y`).
    ///
    /// It opens away from the pointer towards the larger part of the canvas.
    pub fn for_node(
        meta: &NodeMeta,
        total_count: u64,
        x: f64,
        y: f64,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Self {
        let (x, horizontal) = if x > canvas_width / 2.0 {
            (x - POINTER_OFFSET, HorizontalAnchor::Right)
        } else {
            (x + POINTER_OFFSET, HorizontalAnchor::Left)
        };
        let (y, vertical) = if y > canvas_height / 2.0 {
            (y - POINTER_OFFSET, VerticalAnchor::Bottom)
        } else {
            (y + POINTER_OFFSET, VerticalAnchor::Top)
        };

        Self {
            lines: describe(meta, total_count),
            x,
            y,
            horizontal,
            vertical,
        }
    }
}

/// Function, location, sample share and categories of a frame
pub fn describe(meta: &NodeMeta, total_count: u64) -> Vec<String> {
    let percentage = if total_count > 0 {
        meta.count as f64 / total_count as f64 * 100.0
    } else {
        0.0
    };

    let mut lines = vec![
        meta.func.clone(),
        meta.location(),
        format!("{} samples ({:.1} %)", meta.count, percentage),
    ];

    let labels = meta.frame_flags().labels();
    if !labels.is_empty() {
        lines.push(labels.join(", "));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(flags: u8) -> NodeMeta {
        NodeMeta {
            func: "solve".to_string(),
            file: "solver.jl".to_string(),
            line: 42,
            count: 25,
            flags,
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(&meta(0), 200),
            vec!["solve", "solver.jl:42", "25 samples (12.5 %)"]
        );
        assert_eq!(
            describe(&meta(0x03), 0)[2..],
            ["25 samples (0.0 %)", "runtime dispatch, garbage collection"]
        );
    }

    #[test]
    fn test_placement_flips_by_quadrant() {
        let top_left = Tooltip::for_node(&meta(0), 100, 10.0, 10.0, 400.0, 300.0);
        assert_eq!(top_left.horizontal, HorizontalAnchor::Left);
        assert_eq!(top_left.vertical, VerticalAnchor::Top);
        assert_eq!((top_left.x, top_left.y), (20.0, 20.0));

        let bottom_right = Tooltip::for_node(&meta(0), 100, 390.0, 290.0, 400.0, 300.0);
        assert_eq!(bottom_right.horizontal, HorizontalAnchor::Right);
        assert_eq!(bottom_right.vertical, VerticalAnchor::Bottom);
        assert_eq!((bottom_right.x, bottom_right.y), (380.0, 280.0));
    }
}
