//! Offset to line/column mapping

use crate::ast::Position;

/// Maps byte offsets of a source buffer to [`Position`]s.
///
/// The buffer may be a fragment of a larger input, in which case `base` is
/// the position of its first byte and all results are relative to the whole
/// input.
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    src: &'a str,
    base: Position,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_base(src, Position::new(0, 1, 1))
    }

    pub fn with_base(src: &'a str, base: Position) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(src.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            src,
            base,
            line_starts,
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Zero-based line index of `offset` within this buffer.
    pub fn line_index(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.src.len());
        let index = self.line_index(offset);
        let line_start = self.line_starts[index];
        let chars = match self.src.get(line_start..offset) {
            Some(text) => text.chars().count(),
            None => offset - line_start,
        };
        let column = if index == 0 {
            self.base.col() + chars
        } else {
            1 + chars
        };
        Position::new(self.base.offset() + offset, self.base.line() + index, column)
    }
}
