use crate::utils;
use std::fmt;

// Source locations and node identities.

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Position {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SpanLoc(pub Position, pub Position);

impl SpanLoc {
    pub fn new(begin: Position, end: Position) -> SpanLoc {
        SpanLoc(begin, end)
    }
    pub fn begin(&self) -> Position {
        self.0
    }
    pub fn end(&self) -> Position {
        self.1
    }
}

impl fmt::Display for SpanLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct SpanId(utils::Identifier);

impl SpanId {
    // Use this only for debugging purposes.
    pub fn get_number(&self) -> usize {
        self.0.get_number()
    }
}

#[derive(Debug)]
pub struct Spanned<T> {
    span_id: SpanId,
    loc: SpanLoc,
    child: T,
}

impl<T> Spanned<T> {
    pub fn new(loc: SpanLoc, child: T) -> Spanned<T> {
        Self {
            span_id: SpanId(utils::new_id()),
            loc,
            child,
        }
    }
    pub fn get(&self) -> &T {
        &self.child
    }
    pub fn loc(&self) -> &SpanLoc {
        &self.loc
    }
    pub fn id(&self) -> SpanId {
        self.span_id
    }
}

/// A boxed tree node. Recursive node shapes go through this.
#[derive(Debug)]
pub struct SpannedBox<T> {
    child: Box<Spanned<T>>,
}

impl<T> SpannedBox<T> {
    pub fn new(loc: SpanLoc, child: T) -> SpannedBox<T> {
        Self {
            child: Box::new(Spanned::new(loc, child)),
        }
    }
    pub fn get(&self) -> &T {
        self.child.get()
    }
    pub fn loc(&self) -> &SpanLoc {
        self.child.loc()
    }
    pub fn id(&self) -> SpanId {
        self.child.id()
    }
}

impl<T> From<Spanned<T>> for SpannedBox<T> {
    fn from(v: Spanned<T>) -> SpannedBox<T> {
        Self { child: Box::new(v) }
    }
}

/// Convenient macro to create a SpanLoc from begin and end line/column pairs.
#[macro_export]
macro_rules! span_loc {
    ($begin_line:expr, $begin_col:expr, $end_line:expr, $end_col:expr) => {
        $crate::span::SpanLoc::new(
            $crate::span::Position::new($begin_line, $begin_col),
            $crate::span::Position::new($end_line, $end_col),
        )
    };
}
