//! Move between executable cells.

use super::context::CellContext;
use super::partition::Cell;
use crate::document::Position;

/// Closest cell with code above the selection.
///
/// Falls back to the first cell so navigation always has a target; `None`
/// only for an empty partition.
pub fn previous_cell<'a>(cells: &'a [Cell], ctx: &CellContext<'a>) -> Option<&'a Cell> {
    let inf = ctx.inf?;

    // inf under the cursor is the cell we are leaving, otherwise it lies above
    let upper = match ctx.current.first() {
        Some(first) if first.id == inf.id => inf.id,
        _ => inf.id + 1,
    };

    cells[..upper.min(cells.len())]
        .iter()
        .rev()
        .find(|cell| cell.has_code())
        .or_else(|| cells.first())
}

/// Closest cell with code below the selection, falling back to the last cell.
pub fn next_cell<'a>(cells: &'a [Cell], ctx: &CellContext<'a>) -> Option<&'a Cell> {
    let sup = ctx.sup?;

    let lower = match ctx.current.last() {
        Some(last) if last.id == sup.id => sup.id + 1,
        _ => sup.id,
    };

    cells[lower.min(cells.len())..]
        .iter()
        .find(|cell| cell.has_code())
        .or_else(|| cells.last())
}

/// Where the cursor lands when moving to `cell`
pub fn navigation_target(cell: &Cell) -> Position {
    cell.code.map_or(cell.range.start, |code| code.start)
}
