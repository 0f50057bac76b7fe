//! Map cursor selections onto a cell partition.

use super::partition::Cell;
use crate::document::{Position, Selection};
use serde::Serialize;

/// Cells touched by, preceding and following a set of selections.
///
/// Whenever `current` is non-empty:
/// `inf.id <= current[0].id <= current[last].id <= sup.id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CellContext<'a> {
    /// Lowest cell touching or preceding the topmost selection start
    pub inf: Option<&'a Cell>,

    /// Every cell intersecting a selection, sorted by id, without duplicates
    pub current: Vec<&'a Cell>,

    /// Highest cell touching or following the bottommost selection end
    pub sup: Option<&'a Cell>,
}

impl CellContext<'_> {
    pub fn is_empty(&self) -> bool {
        self.inf.is_none() && self.current.is_empty() && self.sup.is_none()
    }

    pub fn current_ids(&self) -> Vec<usize> {
        self.current.iter().map(|c| c.id).collect()
    }
}

/// Leftmost cell at or after `hint` whose range ends at or after `pos`.
///
/// Cells must be sorted and non-overlapping. `None` means `pos` lies beyond
/// every cell, which is an expected outcome.
pub fn find_cell(cells: &[Cell], pos: Position, hint: usize) -> Option<usize> {
    let hint = hint.min(cells.len());
    let idx = hint + cells[hint..].partition_point(|cell| cell.range.end < pos);
    (idx < cells.len()).then_some(idx)
}

/// Resolve the cell context of `selections` against `cells`.
pub fn compute_cell_context<'a>(cells: &'a [Cell], selections: &[Selection]) -> CellContext<'a> {
    if cells.is_empty() || selections.is_empty() {
        return CellContext::default();
    }

    let mut sorted = selections.to_vec();
    sorted.sort_by_key(|sel| sel.start());

    let top = sorted[0].start();
    // a later-starting selection may still end later than all others
    let max_end = sorted
        .iter()
        .map(|sel| sel.end())
        .max()
        .unwrap_or(top);

    let last = cells.len() - 1;

    let mut inf_idx = find_cell(cells, top, 0).unwrap_or(last);
    if cells[inf_idx].range.start > top {
        inf_idx = inf_idx.saturating_sub(1);
    }

    let mut current: Vec<&Cell> = Vec::new();
    let mut hint = 0;
    for sel in &sorted {
        let Some(first) = find_cell(cells, sel.start(), hint) else {
            // every remaining selection starts beyond the last cell
            break;
        };
        hint = first;

        let range = sel.range();
        for cell in cells[first..]
            .iter()
            .take_while(|cell| cell.range.start <= range.end)
        {
            let touched = cell.range.overlaps(&range)
                || (sel.is_empty() && cell.range.contains(range.start));
            if touched {
                current.push(cell);
            }
        }
    }
    current.sort_by_key(|cell| cell.id);
    current.dedup_by_key(|cell| cell.id);

    let sup_idx = match find_cell(cells, max_end, hint) {
        Some(idx) if max_end < cells[idx].range.end => idx,
        Some(idx) => (idx + 1).min(last),
        None => last,
    };

    CellContext {
        inf: Some(&cells[inf_idx]),
        current,
        sup: Some(&cells[sup_idx]),
    }
}
