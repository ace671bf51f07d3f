//! Byte spans and line/column mapping for source text

#![allow(clippy::cast_possible_truncation)] // Spans are u32; source files over 4GB are unsupported

use std::ops::Range;

/// A half-open `[start, end)` byte range in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte
    pub start: u32,
    /// Byte offset one past the last byte
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end byte offsets
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from a `Range<usize>`
    #[must_use]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    /// Length of the span in bytes
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `offset` lies inside the span
    #[must_use]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Convert to a `Range<usize>` for slicing
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// The text covered by this span in `source`, if the span is in bounds
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.as_range())
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Source location with line and column information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column number, in bytes from the line start
    pub column: u32,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to line/column locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offsets where each line starts
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build a line index from source code
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self { line_starts }
    }

    /// Convert a byte offset to a line/column location
    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        Location {
            line: (line + 1) as u32,
            column: offset - line_start + 1,
        }
    }

    /// Get the byte offset where a line starts (0-indexed line number)
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }

    /// Returns true if `offset` is the first byte of a line
    #[must_use]
    pub fn is_line_start(&self, offset: u32) -> bool {
        self.line_starts.binary_search(&offset).is_ok()
    }

    /// Get the number of lines
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
