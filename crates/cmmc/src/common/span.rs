//! Source positions

use std::fmt;

/// A 1-based line/column location in the source text.
///
/// Tree leaves and diagnostics carry positions rather than byte ranges; the
/// reporter maps them back onto the source when rendering snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of one source text to [`Position`]s
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, line_starts }
    }

    /// Position of the byte at `offset`. Columns count characters from the line start.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map_or(offset - start, |text| text.chars().count());
        Position::new(line as u32 + 1, column as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("int x;\n  bool y;\n");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(4), Position::new(1, 5));
        assert_eq!(index.position(7), Position::new(2, 1));
        assert_eq!(index.position(9), Position::new(2, 3));
        assert_eq!(index.position(17), Position::new(3, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("\"\u{e9}\" y\nz");
        assert_eq!(index.position(5), Position::new(1, 5));
        assert_eq!(index.position(7), Position::new(2, 1));
    }
}
