//! Partition a document into code cells.
//!
//! Script documents are split at every line matched by one of the
//! delimiter patterns. The first cell always starts at the top of the
//! document, so a delimiter on the very first line yields a zero-length
//! leading cell.
//!
//! Markdown documents only contain cells inside fenced code blocks; cell 0
//! is an empty placeholder at (0,0).

use crate::document::{Position, Range, TextDocument};
use crate::utils::config::{DEFAULT_CELL_DELIMITERS, DEFAULT_FENCE_END, DEFAULT_FENCE_START};
use crate::utils::config::Settings;
use crate::utils::error::CellError;
use fancy_regex::Regex;
use log::debug;
use serde::Serialize;
use std::path::Path;

/// One executable region of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Index of the cell in its partition
    pub id: usize,

    /// From the delimiter line up to the last character before the next cell
    pub range: Range,

    /// `range` without the delimiter line; `None` when no code is left
    pub code: Option<Range>,

    /// Half-open byte span covered by `range`
    pub offsets: std::ops::Range<usize>,

    /// Half-open byte span of the code
    pub code_offsets: Option<std::ops::Range<usize>>,
}

impl Cell {
    /// Zero-length cell at the top of the document
    fn placeholder() -> Self {
        Self {
            id: 0,
            range: Range::default(),
            code: None,
            offsets: 0..0,
            code_offsets: None,
        }
    }

    pub fn has_code(&self) -> bool {
        self.code.is_some()
    }

    /// Executable text of this cell, empty when it has none
    pub fn code_text<'a, D: TextDocument + ?Sized>(&self, doc: &'a D) -> &'a str {
        self.code_offsets
            .clone()
            .and_then(|span| doc.text().get(span))
            .unwrap_or_default()
    }
}

/// Which partitioning rules apply to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFlavor {
    /// Source file split by delimiter lines
    #[default]
    Script,
    /// Markdown with fenced code blocks
    Markdown,
}

impl DocumentFlavor {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jmd" | "qmd" | "md") => Self::Markdown,
            _ => Self::Script,
        }
    }
}

/// Compiled cell delimiter patterns
#[derive(Debug, Clone)]
pub struct DelimiterSet {
    regex: Regex,
    patterns: Vec<String>,
}

impl DelimiterSet {
    /// Compile an ordered list of patterns into one multiline alternation.
    pub fn new<I, S>(patterns: I) -> Result<Self, CellError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        if patterns.is_empty() {
            return Err(CellError::NoDelimiters);
        }

        // Compile each pattern on its own first so errors name the culprit
        for pattern in &patterns {
            compile(pattern)?;
        }

        let combined = format!("(?m)(?:{})", patterns.join(")|(?:"));
        let regex = compile(&combined)?;

        debug!("Compiled {} cell delimiter patterns", patterns.len());

        Ok(Self { regex, patterns })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Start offsets of every delimiter match, ascending and unique.
    pub fn find_starts(&self, text: &str) -> Result<Vec<usize>, CellError> {
        let mut starts = Vec::new();
        for m in self.regex.find_iter(text) {
            starts.push(m?.start());
        }
        starts.dedup();
        Ok(starts)
    }
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_DELIMITERS).expect("default cell delimiters are valid")
    }
}

/// Compiled start/end fences for markdown documents
#[derive(Debug, Clone)]
pub struct FenceSet {
    start: Regex,
    end: Regex,
}

impl FenceSet {
    pub fn new(start: &str, end: &str) -> Result<Self, CellError> {
        Ok(Self {
            start: compile(&format!("(?m){}", start))?,
            end: compile(&format!("(?m){}", end))?,
        })
    }
}

impl Default for FenceSet {
    fn default() -> Self {
        Self::new(DEFAULT_FENCE_START, DEFAULT_FENCE_END).expect("default fences are valid")
    }
}

fn compile(pattern: &str) -> Result<Regex, CellError> {
    Regex::new(pattern).map_err(|source| CellError::InvalidDelimiter {
        pattern: pattern.to_string(),
        source: Box::new(source),
    })
}

/// Both partitioning strategies with their compiled patterns
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    pub delimiters: DelimiterSet,
    pub fences: FenceSet,
}

impl Partitioner {
    pub fn from_settings(settings: &Settings) -> Result<Self, CellError> {
        Ok(Self {
            delimiters: DelimiterSet::new(&settings.cell_delimiters)?,
            fences: FenceSet::new(&settings.markdown_fences.start, &settings.markdown_fences.end)?,
        })
    }

    pub fn partition<D: TextDocument + ?Sized>(
        &self,
        doc: &D,
        flavor: DocumentFlavor,
    ) -> Result<Vec<Cell>, CellError> {
        match flavor {
            DocumentFlavor::Script => compute_partition(doc, &self.delimiters),
            DocumentFlavor::Markdown => compute_markdown_partition(doc, &self.fences),
        }
    }
}

/// Split a script document at every delimiter match.
///
/// The resulting cells tile the whole document: `cells[i].offsets.end ==
/// cells[i + 1].offsets.start`, the first cell starts at 0 and the last one
/// ends at the document length.
pub fn compute_partition<D: TextDocument + ?Sized>(
    doc: &D,
    delimiters: &DelimiterSet,
) -> Result<Vec<Cell>, CellError> {
    let text = doc.text();

    let mut bounds = Vec::new();
    bounds.push(0);
    bounds.extend(delimiters.find_starts(text)?);
    bounds.push(text.len());

    let cells: Vec<Cell> = bounds
        .windows(2)
        .enumerate()
        .map(|(id, pair)| build_cell(doc, id, pair[0], pair[1]))
        .collect();

    debug!("Partitioned {} bytes into {} cells", text.len(), cells.len());

    Ok(cells)
}

fn build_cell<D: TextDocument + ?Sized>(doc: &D, id: usize, start: usize, end: usize) -> Cell {
    let range_start = doc.position_at(start);
    let range_end = if end > start {
        doc.position_at(end - 1)
    } else {
        range_start
    };

    // every cell but the first loses its delimiter line
    let code_start = if id == 0 {
        Some(range_start)
    } else if range_start.line + 1 < doc.line_count() {
        Some(Position::new(range_start.line + 1, range_start.character))
    } else {
        None
    };

    let code = code_start
        .filter(|cs| end > start && *cs <= range_end)
        .map(|cs| Range::new(cs, range_end));
    let code_offsets = code.map(|r| doc.offset_at(r.start)..end);

    Cell {
        id,
        range: Range::new(range_start, range_end),
        code,
        offsets: start..end,
        code_offsets,
    }
}

/// Collect fenced code blocks of a markdown document.
///
/// An unterminated fence extends to the end of the document and ends the scan.
pub fn compute_markdown_partition<D: TextDocument + ?Sized>(
    doc: &D,
    fences: &FenceSet,
) -> Result<Vec<Cell>, CellError> {
    let text = doc.text();
    let mut cells = vec![Cell::placeholder()];
    let mut search_from = 0;

    while let Some(open) = fences.start.find_from_pos(text, search_from)? {
        if open.start() >= text.len() {
            break;
        }
        let open_pos = doc.position_at(open.start());
        let body_line = open_pos.line + 1;
        let body_start = if body_line < doc.line_count() {
            doc.offset_at(Position::new(body_line, 0))
        } else {
            text.len()
        };

        let close = fences.end.find_from_pos(text, body_start)?;
        let (cell_end, body_end) = match &close {
            Some(close) => (close.end(), close.start()),
            None => (text.len(), text.len()),
        };

        let (code, code_offsets) = if body_end > body_start {
            let range = Range::new(Position::new(body_line, 0), doc.position_at(body_end - 1));
            (Some(range), Some(body_start..body_end))
        } else {
            (None, None)
        };

        cells.push(Cell {
            id: cells.len(),
            range: Range::new(open_pos, doc.position_at(cell_end.saturating_sub(1).max(open.start()))),
            code,
            offsets: open.start()..cell_end,
            code_offsets,
        });

        match close {
            // empty fence matches must not pin the scan in place
            Some(close) => search_from = close.end().max(next_char_boundary(text, open.start())),
            None => {
                debug!("Unterminated code fence at line {}", open_pos.line);
                break;
            }
        }
    }

    debug!("Found {} fenced cells", cells.len() - 1);

    Ok(cells)
}

fn next_char_boundary(text: &str, offset: usize) -> usize {
    offset + text[offset..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SourceText;
    use pretty_assertions::assert_eq;

    fn partition(text: &str) -> (SourceText, Vec<Cell>) {
        let doc = SourceText::new(text);
        let cells = compute_partition(&doc, &DelimiterSet::default()).unwrap();
        (doc, cells)
    }

    #[test]
    fn test_single_delimiter() {
        let (doc, cells) = partition("a\n## \nb\nc");

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].range, Range::new(Position::new(0, 0), Position::new(0, 1)));
        assert_eq!(cells[0].code, Some(cells[0].range));
        assert_eq!(cells[0].code_text(&doc), "a\n");

        assert_eq!(cells[1].range, Range::new(Position::new(1, 0), Position::new(3, 0)));
        assert_eq!(cells[1].code, Some(Range::new(Position::new(2, 0), Position::new(3, 0))));
        assert_eq!(cells[1].code_text(&doc), "b\nc");
    }

    #[test]
    fn test_leading_delimiter_gives_empty_first_cell() {
        let (doc, cells) = partition("## \na");

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].range.start, Position::new(0, 0));
        assert_eq!(cells[0].offsets, 0..0);
        assert_eq!(cells[0].code, None);
        assert_eq!(cells[1].code_text(&doc), "a");
    }

    #[test]
    fn test_delimiter_only_cells_have_no_code() {
        let (_, cells) = partition("a\n## \n## \nb");
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[1].code, None);
        assert!(cells[2].has_code());

        let (_, cells) = partition("a\n## ");
        assert_eq!(cells[1].code, None);

        let (_, cells) = partition("a\n## \n");
        assert_eq!(cells[1].code, None);
    }

    #[test]
    fn test_triple_hash_is_not_a_delimiter() {
        let (_, cells) = partition("a\n### heading\nb\n#%% x\nc\n# %%\nd\n#+\ne\n#-\nf");
        let starts: Vec<usize> = cells.iter().map(|c| c.range.start.line).collect();
        assert_eq!(starts, vec![0, 3, 5, 7, 9]);
    }

    #[test]
    fn test_cells_tile_document() {
        let text = "x = 1\n## one\ny = 2\n\n#%% two\n## three\nz\n";
        let (_, cells) = partition(text);

        assert_eq!(cells[0].offsets.start, 0);
        assert_eq!(cells.last().unwrap().offsets.end, text.len());
        for (i, pair) in cells.windows(2).enumerate() {
            assert_eq!(pair[0].id, i);
            assert_eq!(pair[0].offsets.end, pair[1].offsets.start);
        }
    }

    #[test]
    fn test_partition_is_idempotent() {
        let (_, a) = partition("a\n##\nb\n##\n");
        let (_, b) = partition("a\n##\nb\n##\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_document() {
        let (_, cells) = partition("");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].code, None);
    }

    #[test]
    fn test_invalid_delimiter_is_reported() {
        let err = DelimiterSet::new(["^##(", "^#%%"]).unwrap_err();
        assert!(matches!(err, CellError::InvalidDelimiter { ref pattern, .. } if pattern == "^##("));
        assert!(matches!(DelimiterSet::new(Vec::<String>::new()), Err(CellError::NoDelimiters)));
    }

    #[test]
    fn test_markdown_fences() {
        let text = "# Title\n\n```julia\nx = 1\ny = 2\n```\ntext\n```{julia}\nz\n```\n";
        let doc = SourceText::new(text);
        let cells = compute_markdown_partition(&doc, &FenceSet::default()).unwrap();

        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].range, Range::default());
        assert_eq!(cells[0].code, None);

        assert_eq!(cells[1].range.start, Position::new(2, 0));
        assert_eq!(cells[1].range.end.line, 5);
        assert_eq!(cells[1].code_text(&doc), "x = 1\ny = 2\n");

        assert_eq!(cells[2].range.start, Position::new(7, 0));
        assert_eq!(cells[2].code_text(&doc), "z\n");
    }

    #[test]
    fn test_markdown_unterminated_fence() {
        let doc = SourceText::new("```julia\na\nb");
        let cells = compute_markdown_partition(&doc, &FenceSet::default()).unwrap();

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].code_text(&doc), "a\nb");
        assert_eq!(cells[1].offsets.end, doc.text().len());
    }

    #[test]
    fn test_markdown_empty_fence() {
        let doc = SourceText::new("```julia\n```\n");
        let cells = compute_markdown_partition(&doc, &FenceSet::default()).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].code, None);
    }

    #[test]
    fn test_markdown_empty_matching_fences_terminate() {
        let doc = SourceText::new("a\n");
        let fences = FenceSet::new("^", "$").unwrap();
        let cells = compute_markdown_partition(&doc, &fences).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].offsets, 0..2);

        let doc = SourceText::new("a\nb\nc\n");
        let fences = FenceSet::new("^", "^").unwrap();
        let cells = compute_markdown_partition(&doc, &fences).unwrap();
        assert!(cells.len() >= 3);
        for pair in cells[1..].windows(2) {
            assert!(pair[0].offsets.start < pair[1].offsets.start);
        }
        assert!(cells.iter().all(|c| c.offsets.end <= doc.text().len()));
    }

    #[test]
    fn test_flavor_from_path() {
        assert_eq!(DocumentFlavor::from_path(Path::new("a.jmd")), DocumentFlavor::Markdown);
        assert_eq!(DocumentFlavor::from_path(Path::new("notes.qmd")), DocumentFlavor::Markdown);
        assert_eq!(DocumentFlavor::from_path(Path::new("script.jl")), DocumentFlavor::Script);
    }
}
