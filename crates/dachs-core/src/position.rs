use std::fmt;
use std::sync::Arc;

use crate::source::Source;

/// A point in a source code.
///
/// `line` and `column` are 1-based. Columns are counted in bytes, the same
/// unit as `offset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub source: Arc<Source>,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize, source: Arc<Source>) -> Self {
        Self {
            offset,
            line,
            column,
            source,
        }
    }

    /// Head of the source.
    pub fn start_of(source: Arc<Source>) -> Self {
        Self::new(0, 1, 1, source)
    }

    /// Source text from this position up to `end`.
    pub fn text_to(&self, end: &Position) -> std::borrow::Cow<'_, str> {
        self.source.slice(self.offset, end.offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.name, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_position() {
        let p = Position::new(4, 1, 5, Source::dummy("foo bar"));
        assert_eq!(p.to_string(), "<dummy>:1:5");
    }

    #[test]
    fn text_between_positions() {
        let src = Source::dummy("foo bar");
        let s = Position::new(4, 1, 5, src.clone());
        let e = Position::new(7, 1, 8, src);
        assert_eq!(s.text_to(&e), "bar");
    }
}
