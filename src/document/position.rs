//! Positions, ranges and selections within a text document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A zero-based (line, column) location. The column is a byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses `LINE:COL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, character) = s
            .split_once(':')
            .ok_or_else(|| format!("expected LINE:COL, got `{}`", s))?;
        let line = line
            .trim()
            .parse()
            .map_err(|_| format!("invalid line number `{}`", line))?;
        let character = character
            .trim()
            .parse()
            .map_err(|_| format!("invalid column `{}`", character))?;
        Ok(Self { line, character })
    }
}

/// A range between two positions, closed at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Closed containment: both endpoints count.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// True when the intersection with `other` has positive extent.
    ///
    /// Ranges that only touch at a single position do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

/// A cursor selection. `anchor` is where it started, `active` where the caret is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection at `pos`
    pub fn caret(pos: Position) -> Self {
        Self { anchor: pos, active: pos }
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn range(&self) -> Range {
        Range::new(self.start(), self.end())
    }
}

impl FromStr for Selection {
    type Err = String;

    /// Parses `LINE:COL` (a caret) or `LINE:COL-LINE:COL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((anchor, active)) => Ok(Self::new(anchor.parse()?, active.parse()?)),
            None => Ok(Self::caret(s.parse()?)),
        }
    }
}
