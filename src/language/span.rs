use miette::SourceSpan;

/// Position of a node in the original script source.
///
/// Line and column are 1-based and come straight from the parser's tokens;
/// `start`/`end` are byte offsets into the source text, used for report
/// labels. Hand-built ASTs may leave the byte range empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            start: 0,
            end: 0,
        }
    }

    pub fn with_range(line: u32, column: u32, start: usize, end: usize) -> Self {
        Self {
            line,
            column,
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_source_span(&self) -> SourceSpan {
        (self.start, self.len()).into()
    }
}
