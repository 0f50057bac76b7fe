//! Flame graph layout and drawing.
//!
//! Each row is one call depth. A child's width is its share of the parent's
//! samples; siblings are packed left to right under their parent.
//!
//! Culling is deliberately asymmetric: a row is drawn whenever its bottom
//! edge is at or below the top of the viewport, but its children are only
//! visited while the row's bottom edge is still inside the viewport.

use super::color::node_colors;
use super::surface::{FontMetrics, Rect, Surface};
use crate::profile::{NodeId, NodeMeta, SampleTree};
use crate::utils::config::{BOX_PADDING, TEXT_THRESHOLD};
use log::debug;

/// Geometry of the most recent layout pass
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    rects: Vec<Option<Rect>>,
    can_scroll_down: bool,
}

impl LayoutCache {
    fn reset(&mut self, node_count: usize) {
        self.rects.clear();
        self.rects.resize(node_count, None);
        self.can_scroll_down = false;
    }

    /// Forget all geometry, e.g. after the data changed
    pub fn invalidate(&mut self) {
        self.rects.clear();
        self.can_scroll_down = false;
    }

    /// Box of `id` if it was visited by the last pass
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(id.0).copied().flatten()
    }

    /// A row was cut off by the bottom of the viewport
    pub fn can_scroll_down(&self) -> bool {
        self.can_scroll_down
    }

    pub fn laid_out(&self) -> impl Iterator<Item = (NodeId, Rect)> + '_ {
        self.rects
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.map(|r| (NodeId(i), r)))
    }
}

/// Fixed row height derived from the font, not from the data
pub fn row_height(metrics: FontMetrics) -> f64 {
    (metrics.ascent + metrics.descent).ceil() + 2.0 * BOX_PADDING
}

/// Width of a child proportional to its share of the parent's samples.
///
/// A parent without samples has nothing to share out and yields 0.
pub fn child_width(parent_width: f64, parent_count: u64, child_count: u64) -> f64 {
    if parent_count == 0 {
        return 0.0;
    }
    parent_width * (child_count as f64 / parent_count as f64)
}

/// Label truncated with an ellipsis to fit `available` pixels.
pub fn fit_label(label: &str, available: f64, metrics: &FontMetrics) -> Option<String> {
    if label.is_empty() || metrics.char_width <= 0.0 {
        return None;
    }

    let max_chars = (available / metrics.char_width).floor() as usize;
    if label.chars().count() <= max_chars {
        return Some(label.to_string());
    }
    if max_chars < 2 {
        return None;
    }

    Some(label.chars().take(max_chars - 1).chain(std::iter::once('…')).collect())
}

/// Lay out and draw the subtree at `start` with its root row at (`x`, `y`).
///
/// Every visited node gets its box recorded in `cache`, whether or not it
/// was drawn. Nodes below a row that crosses the viewport bottom are not
/// visited and flag the cache as scrollable.
pub fn draw_graph<S: Surface + ?Sized>(
    surface: &mut S,
    tree: &SampleTree,
    start: NodeId,
    width: f64,
    x: f64,
    y: f64,
    cache: &mut LayoutCache,
) {
    cache.reset(tree.len());

    let metrics = surface.font_metrics();
    let row_height = row_height(metrics);
    let (_, viewport_height) = surface.size();

    let mut drawn = 0usize;
    let mut stack = vec![(start, x, y, width)];

    while let Some((id, x, y, width)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };

        let rect = Rect::new(x, y, width.max(1.0), row_height);

        if y + row_height >= 0.0 {
            draw_box(surface, &node.meta, rect, &metrics);
            drawn += 1;
        }

        cache.rects[id.0] = Some(rect);

        if y + row_height > viewport_height {
            cache.can_scroll_down = true;
            continue;
        }

        let mut child_x = x;
        let mut placed = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            let count = tree.meta(child).map_or(0, |m| m.count);
            let w = child_width(width, node.meta.count, count);
            placed.push((child, child_x, y + row_height, w));
            child_x += w;
        }
        // reversed so the leftmost child is drawn first
        stack.extend(placed.into_iter().rev());
    }

    debug!("Drew {} of {} nodes", drawn, tree.len());
}

fn draw_box<S: Surface + ?Sized>(surface: &mut S, meta: &NodeMeta, rect: Rect, metrics: &FontMetrics) {
    let colors = node_colors(meta);
    surface.fill_rect(rect, colors.fill);
    surface.stroke_rect(rect, colors.stroke);

    let available = rect.width - 2.0 * BOX_PADDING;
    if available <= TEXT_THRESHOLD {
        return;
    }
    if let Some(label) = fit_label(&meta.func, available, metrics) {
        surface.fill_text(
            &label,
            rect.x + BOX_PADDING,
            rect.y + BOX_PADDING + metrics.ascent,
            rect,
            colors.text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flamegraph::surface::RecordingSurface;
    use crate::profile::SampleNode;

    fn node(func: &str, count: u64, children: Vec<SampleNode>) -> SampleNode {
        SampleNode {
            meta: NodeMeta {
                func: func.to_string(),
                file: "f.jl".to_string(),
                line: 1,
                count,
                flags: 0,
            },
            children,
        }
    }

    #[test]
    fn test_child_width() {
        assert_eq!(child_width(1000.0, 100, 30), 300.0);
        assert_eq!(child_width(1000.0, 0, 30), 0.0);
        assert_eq!(child_width(1000.0, 100, 0), 0.0);
    }

    #[test]
    fn test_fit_label() {
        let metrics = FontMetrics::for_size(10.0); // 6px per char
        assert_eq!(fit_label("abc", 30.0, &metrics), Some("abc".to_string()));
        assert_eq!(fit_label("abcdefgh", 30.0, &metrics), Some("abcd…".to_string()));
        assert_eq!(fit_label("abcdefgh", 7.0, &metrics), None);
        assert_eq!(fit_label("", 100.0, &metrics), None);
    }

    #[test]
    fn test_row_height() {
        assert_eq!(row_height(FontMetrics::for_size(12.0)), 16.0);
    }

    #[test]
    fn test_children_split_parent_width() {
        let tree = SampleTree::from_root(node(
            "root",
            100,
            vec![node("a", 30, vec![]), node("b", 70, vec![])],
        ));
        let mut surface = RecordingSurface::new(1000.0, 500.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 1000.0, 0.0, 0.0, &mut cache);

        let a = cache.rect(NodeId(1)).unwrap();
        let b = cache.rect(NodeId(2)).unwrap();
        assert!((a.width + b.width - 1000.0).abs() < 1e-9);
        assert!((a.width / b.width - 30.0 / 70.0).abs() < 1e-9);
        assert_eq!(b.x, a.right());
        assert_eq!(a.y, 16.0);
        assert!(!cache.can_scroll_down());
    }

    #[test]
    fn test_self_time_leaves_gap() {
        let tree = SampleTree::from_root(node("root", 10, vec![node("a", 4, vec![])]));
        let mut surface = RecordingSurface::new(100.0, 100.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 100.0, 0.0, 0.0, &mut cache);

        assert_eq!(cache.rect(NodeId(1)).unwrap().width, 40.0);
    }

    #[test]
    fn test_zero_count_parent_lays_out_thin_children() {
        let tree = SampleTree::from_root(node("root", 0, vec![node("a", 0, vec![])]));
        let mut surface = RecordingSurface::new(100.0, 100.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 100.0, 0.0, 0.0, &mut cache);

        let child = cache.rect(NodeId(1)).unwrap();
        assert!(child.width.is_finite());
        assert_eq!(child.width, 1.0);
    }

    #[test]
    fn test_tiny_nodes_stay_one_pixel_wide() {
        let tree = SampleTree::from_root(node(
            "root",
            100_000,
            vec![node("tiny", 1, vec![]), node("big", 99_999, vec![])],
        ));
        let mut surface = RecordingSurface::new(100.0, 100.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 100.0, 0.0, 0.0, &mut cache);

        assert_eq!(cache.rect(NodeId(1)).unwrap().width, 1.0);
        // the sibling is still placed by the unfloored width
        assert!(cache.rect(NodeId(2)).unwrap().x < 0.01);
    }

    #[test]
    fn test_rows_below_viewport_are_cut() {
        // chain of 10 frames, 16px rows, 40px viewport
        let mut chain = node("leaf", 1, vec![]);
        for _ in 0..9 {
            chain = node("frame", 1, vec![chain]);
        }
        let tree = SampleTree::from_root(chain);
        let mut surface = RecordingSurface::new(100.0, 40.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 100.0, 0.0, 0.0, &mut cache);

        // rows at y = 0, 16 recurse; row at 32 crosses 40 and stops
        assert_eq!(cache.laid_out().count(), 3);
        assert!(cache.can_scroll_down());
        assert_eq!(surface.filled_rects().len(), 3);
    }

    #[test]
    fn test_rows_above_viewport_are_recorded_not_drawn() {
        let mut chain = node("leaf", 1, vec![]);
        for _ in 0..4 {
            chain = node("frame", 1, vec![chain]);
        }
        let tree = SampleTree::from_root(chain);
        let mut surface = RecordingSurface::new(100.0, 200.0, 12.0);
        let mut cache = LayoutCache::default();

        // scrolled so the first two rows (bottoms at -24 and -8) are hidden
        draw_graph(&mut surface, &tree, tree.root(), 100.0, 0.0, -40.0, &mut cache);

        assert_eq!(cache.laid_out().count(), 5);
        assert_eq!(cache.rect(NodeId(0)).unwrap().y, -40.0);
        let drawn_ys: Vec<f64> = surface.filled_rects().iter().map(|r| r.y).collect();
        assert_eq!(drawn_ys, vec![-8.0, 8.0, 24.0]);
    }

    #[test]
    fn test_labels_only_when_wide_enough() {
        let tree = SampleTree::from_root(node(
            "root",
            100,
            vec![node("wide_function", 97, vec![]), node("narrow", 3, vec![])],
        ));
        let mut surface = RecordingSurface::new(200.0, 100.0, 12.0);
        let mut cache = LayoutCache::default();

        draw_graph(&mut surface, &tree, tree.root(), 200.0, 0.0, 0.0, &mut cache);

        assert_eq!(surface.texts(), vec!["root", "wide_function"]);
    }
}
