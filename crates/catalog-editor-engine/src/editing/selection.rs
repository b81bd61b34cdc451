use std::ops::{Range, RangeInclusive};

use serde::Serialize;

use crate::editing::node::{FormatFlags, StyleOverrides};

/// A position in the document: text leaf index plus character offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    pub leaf: usize,
    pub offset: usize,
}

impl Point {
    pub fn new(leaf: usize, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

/// Caret or range selection.
///
/// `format` and `style` are the pending marks of a collapsed selection: text
/// typed at the caret gets them. They are recomputed from the document
/// whenever the selection is moved by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
    pub format: FormatFlags,
    pub style: StyleOverrides,
}

impl Selection {
    pub fn caret(leaf: usize, offset: usize) -> Self {
        let point = Point::new(leaf, offset);
        Self {
            anchor: point,
            focus: point,
            ..Self::default()
        }
    }

    pub fn range(anchor: Point, focus: Point) -> Self {
        Self {
            anchor,
            focus,
            ..Self::default()
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }

    /// Indices of all leaves the selection touches
    pub fn leaves(&self) -> RangeInclusive<usize> {
        self.start().leaf..=self.end().leaf
    }

    /// Character range selected inside `leaf`, whose length is `leaf_len`
    pub fn range_in_leaf(&self, leaf: usize, leaf_len: usize) -> Range<usize> {
        let (start, end) = (self.start(), self.end());
        let from = if leaf == start.leaf { start.offset } else { 0 };
        let to = if leaf == end.leaf { end.offset } else { leaf_len };
        from.min(leaf_len)..to.min(leaf_len).max(from.min(leaf_len))
    }

    /// Collapse to a caret, keeping pending marks
    pub(crate) fn collapse_to(&mut self, point: Point) {
        self.anchor = point;
        self.focus = point;
    }
}
