//! Source locations.

use std::fmt;

/// A region of source text, with the 1-based line and column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// A span that only carries a line number.
    pub fn at_line(line: usize) -> Self {
        Self::new(0, 0, line, 0)
    }

    /// Merge two spans into one covering both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_line() {
        let a = Span::new(4, 6, 2, 5);
        let b = Span::new(10, 14, 3, 1);
        let merged = a.merge(&b);
        assert_eq!(merged, Span::new(4, 14, 2, 5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(0, 1, 7, 3).to_string(), "7:3");
    }
}
