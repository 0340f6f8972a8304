//! Source locations inside an expression
//!
//! Offsets are byte offsets into the expression text. Line and column are kept
//! alongside so diagnostics can point into multi-line expressions (expressions
//! read from files may contain `\n` as whitespace).
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub offset: usize,
    /// 1-based
    pub line: u32,
    /// 1-based, in characters rather than bytes
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// First character of the expression
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `start..end` of expression text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "span ends before it starts");
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Offsets only; line and column stay 0. Intended for tests.
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(Position::new(start, 0, 0), Position::new(end, 0, 0))
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: std::cmp::min_by_key(self.start, other.start, |p| p.offset),
            end: std::cmp::max_by_key(self.end, other.end, |p| p.offset),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }

    /// Placeholder for errors that have no location
    pub fn dummy() -> Self {
        Self::new(Position::start(), Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Borrowed expression text with an index of line starts
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Offsets past the end clamp to the end; offsets inside a character move
    /// back to its first byte.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line_index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line_index];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, line_index as u32 + 1, column as u32 + 1)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position_at(start), self.position_at(end.max(start)))
    }

    /// Text of a 1-based line without its terminator
    pub fn get_line(&self, line: u32) -> Option<&'a str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Cargo-style diagnostic: message, location, the source line and a caret run
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "error: {}", message);
        let _ = writeln!(out, "  --> {}", span.start);

        let Some(line) = self.get_line(span.start.line) else {
            return out;
        };

        let number = span.start.line.to_string();
        let gutter = " ".repeat(number.len());
        let indent = " ".repeat(span.start.column.saturating_sub(1) as usize);
        let width = if span.end.line == span.start.line {
            span.end.column.saturating_sub(span.start.column) as usize
        } else {
            (line.chars().count() + 1).saturating_sub(span.start.column as usize)
        };

        let _ = writeln!(out, "   {} |", gutter);
        let _ = writeln!(out, "   {} | {}", number, line);
        let _ = writeln!(out, "   {} | {}{}", gutter, indent, "^".repeat(width.max(1)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_multiline() {
        let map = SourceMap::new("{h:k.last(0)}=1\nand 2");
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(14), Position::new(14, 1, 15));
        assert_eq!(map.position_at(16), Position::new(16, 2, 1));
        assert_eq!(map.position_at(20), Position::new(20, 2, 5));
    }

    #[test]
    fn test_position_counts_characters_not_bytes() {
        let map = SourceMap::new("{h:k[ГУГЛ].last(0)}");
        // 'Г' is two bytes; offset 9 sits after two of them
        assert_eq!(map.position_at(9).column, 8);
        assert_eq!(map.position_at(10).offset, 9);
    }

    #[test]
    fn test_position_clamps_past_end() {
        let map = SourceMap::new("1+");
        assert_eq!(map.position_at(10).offset, 2);
    }

    #[test]
    fn test_get_line() {
        let map = SourceMap::new("1 +\r\n2");
        assert_eq!(map.get_line(1), Some("1 +"));
        assert_eq!(map.get_line(2), Some("2"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(3), None);
    }

    #[test]
    fn test_span_merge_and_slice() {
        let a = Span::from_offsets(2, 4);
        let b = Span::from_offsets(6, 9);
        let merged = a.merge(b);
        assert_eq!(merged.len(), 7);
        assert_eq!(merged.slice("0123456789"), "2345678");
        assert!(!merged.is_empty());
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("1 + + 2");
        let span = map.span(4, 5);
        let rendered = map.format_error(&span, "unexpected '+'");

        assert!(rendered.starts_with("error: unexpected '+'"));
        assert!(rendered.contains("--> 1:5"));
        assert!(rendered.contains("1 | 1 + + 2"));
        assert!(rendered.trim_end().ends_with("    ^"));
    }
}
