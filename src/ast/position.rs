//! Source Positions
//!
//! A position is a byte offset into the input together with the 1-based
//! line and column it maps to. Columns count characters, not bytes.

use std::fmt;

use serde::Serialize;

/// A location in the source text.
///
/// The default value has line 0 and stands for "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    offset: usize,
    line: usize,
    column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self { offset, line, column }
    }

    /// Byte offset from the start of the input, starting at 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Line number, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column number, starting at 1.
    pub fn col(&self) -> usize {
        self.column
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }

    /// Whether `self` comes strictly after `other` in the source.
    pub fn after(&self, other: Position) -> bool {
        self.offset > other.offset
    }

    /// The position `n` characters further along the same line.
    ///
    /// Only meaningful for single-byte characters, such as the closing
    /// delimiter of a construct.
    pub fn shifted(&self, n: usize) -> Position {
        if !self.is_valid() {
            return *self;
        }
        Position::new(self.offset + n, self.line, self.column + n)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pos = Position::new(4, 1, 5);
        assert_eq!(pos.to_string(), "1:5");
        assert_eq!(pos.offset(), 4);
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.col(), 5);
    }

    #[test]
    fn test_default_is_invalid() {
        assert!(!Position::default().is_valid());
        assert!(Position::new(0, 1, 1).is_valid());
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(Position::new(3, 2, 1), Position::new(3, 2, 1));
        assert_ne!(Position::new(3, 2, 1), Position::new(3, 2, 2));
        assert!(Position::new(5, 1, 6).after(Position::new(4, 1, 5)));
    }
}
