//! Hit-testing against the geometry of the last layout pass.

use super::layout::LayoutCache;
use crate::profile::{NodeId, SampleTree};

/// Deepest-first search for the node under (`x`, `y`), starting at `root`.
///
/// A node is a candidate when `floor(x0) <= x <= ceil(x0 + width)` and
/// `y >= y0`. It is the hit if also `y <= y0 + height`; otherwise its
/// children are searched in order and the first hit wins. Nodes that were
/// not visited by the last layout pass never match.
pub fn find_node_at(
    tree: &SampleTree,
    cache: &LayoutCache,
    root: NodeId,
    x: f64,
    y: f64,
) -> Option<NodeId> {
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        let Some(rect) = cache.rect(id) else {
            continue;
        };

        let in_column = x >= rect.x.floor() && x <= (rect.x + rect.width).ceil();
        if !in_column || y < rect.y {
            continue;
        }
        if y <= rect.y + rect.height {
            return Some(id);
        }

        stack.extend(tree.children(id).iter().rev().copied());
    }

    None
}
