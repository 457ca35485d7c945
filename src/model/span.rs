//! Character spans inside a view
//!
//! A span is a `[a, b)` range of character offsets. `a` is the anchor and `b`
//! the caret end, so `a` may be greater than `b` for a reversed selection.
//! Use `begin()`/`end()` when direction does not matter.

use std::fmt;

/// A character range in a view, with an optional horizontal caret hint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    /// Anchor offset
    pub a: usize,
    /// Caret offset
    pub b: usize,
    /// Preferred x position of the caret when moving vertically, if any
    pub xpos: Option<f64>,
}

impl Span {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b, xpos: None }
    }

    /// An empty span at `point` (a caret)
    pub fn point(point: usize) -> Self {
        Self::new(point, point)
    }

    pub fn with_xpos(mut self, xpos: f64) -> Self {
        self.xpos = Some(xpos);
        self
    }

    pub fn begin(&self) -> usize {
        self.a.min(self.b)
    }

    pub fn end(&self) -> usize {
        self.a.max(self.b)
    }

    pub fn size(&self) -> usize {
        self.end() - self.begin()
    }

    pub fn is_empty(&self) -> bool {
        self.a == self.b
    }

    /// True if `point` lies within the span, inclusive of both ends.
    ///
    /// Click resolution uses [`Span::contains_click`] instead, which excludes
    /// the end.
    pub fn contains(&self, point: usize) -> bool {
        self.begin() <= point && point <= self.end()
    }

    /// True if a caret at `point` should count as clicking this span.
    pub fn contains_click(&self, point: usize) -> bool {
        self.contains(point) && point != self.end()
    }

    /// True if `other` lies entirely within this span
    pub fn contains_span(&self, other: &Span) -> bool {
        self.begin() <= other.begin() && other.end() <= self.end()
    }

    /// True if the spans share at least one character, or are equal empty spans
    pub fn intersects(&self, other: &Span) -> bool {
        let lb = self.begin().max(other.begin());
        let le = self.end().min(other.end());
        lb < le || (self.is_empty() && other.is_empty() && self.a == other.a)
    }

    /// The overlapping part of two spans, or an empty span at 0 if they do not overlap
    pub fn intersection(&self, other: &Span) -> Span {
        if !self.intersects(other) {
            return Span::default();
        }
        Span::new(
            self.begin().max(other.begin()),
            self.end().min(other.end()),
        )
    }

    /// Smallest span covering both spans
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(
            self.begin().min(other.begin()),
            self.end().max(other.end()),
        )
    }

    /// Normalized copy with `a <= b`, keeping the xpos hint
    pub fn normalized(&self) -> Span {
        Span {
            a: self.begin(),
            b: self.end(),
            xpos: self.xpos,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}
