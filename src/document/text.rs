//! Text buffer abstraction consumed by the cell model.

use super::position::Position;

/// Read-only view of a text document.
///
/// Offsets are byte offsets into [`TextDocument::text`].
pub trait TextDocument {
    /// Full document text
    fn text(&self) -> &str;

    /// Number of lines; a document always has at least one (possibly empty) line.
    fn line_count(&self) -> usize;

    /// Text of a line without its line terminator
    fn line(&self, line: usize) -> Option<&str>;

    /// Convert a position to an offset, clamping to the document.
    fn offset_at(&self, pos: Position) -> usize;

    /// Convert an offset to a position, clamping to the document.
    fn position_at(&self, offset: usize) -> Position;
}

/// An owned document with a precomputed line-start index.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    /// Byte offsets where each line starts. `line_starts[0] == 0` always.
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Byte offset where the content of `line` ends (before `\n` or `\r\n`).
    fn line_end(&self, line: usize) -> usize {
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        let start = self.line_starts[line];
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }
}

impl TextDocument for SourceText {
    fn text(&self) -> &str {
        &self.text
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        Some(&self.text[start..self.line_end(line)])
    }

    fn offset_at(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        let start = self.line_starts[line];
        let len = self.line_end(line) - start;
        start + pos.character.min(len)
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        Position::new(line, offset - self.line_starts[line])
    }
}
