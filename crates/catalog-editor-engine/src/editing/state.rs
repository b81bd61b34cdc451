use serde::Serialize;

use crate::EditorError;
use crate::editing::document::{Document, Leaf};
use crate::editing::node::{FormatFlags, Span, StyleOverrides, TextBlock};
use crate::editing::selection::{Point, Selection};

/// Immutable editor snapshot: a document plus the selection inside it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditorState {
    pub document: Document,
    pub selection: Selection,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        let mut state = Self {
            document,
            selection: Selection::caret(0, 0),
        };
        state.refresh_marks();
        state
    }

    /// Check that both selection points address existing characters
    pub fn check_selection(&self, selection: &Selection) -> Result<(), EditorError> {
        for point in [selection.anchor, selection.focus] {
            self.check_point(point)?;
        }
        Ok(())
    }

    fn check_point(&self, point: Point) -> Result<(), EditorError> {
        match self.document.leaf_len(point.leaf) {
            Some(len) if point.offset <= len => Ok(()),
            _ => Err(EditorError::SelectionOutOfBounds {
                leaf: point.leaf,
                offset: point.offset,
            }),
        }
    }

    /// Leaf holding the selection anchor
    pub fn anchor_leaf(&self) -> Option<Leaf<'_>> {
        self.document.leaf(self.selection.anchor.leaf)
    }

    /// Every span covered by the selection, split at its edges
    pub fn selected_spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        for leaf in self.document.leaves() {
            if !self.selection.leaves().contains(&leaf.index) {
                continue;
            }
            let range = self
                .selection
                .range_in_leaf(leaf.index, leaf.content.char_len());
            spans.extend(leaf.content.spans_in(range));
        }
        spans
    }

    /// Span at the selection start: the character before a caret, or the
    /// first selected character of a range
    pub fn span_at_start(&self) -> Option<Span> {
        let start = self.selection.start();
        let lookup = if self.selection.is_collapsed() {
            start.offset
        } else {
            start.offset + 1
        };
        self.document.leaf(start.leaf)?.content.span_at_caret(lookup)
    }

    /// Reset pending marks to those of the text at the selection start
    pub(crate) fn refresh_marks(&mut self) {
        let (format, style) = self
            .span_at_start()
            .map(|span| (span.run.format, span.run.style))
            .unwrap_or((FormatFlags::empty(), StyleOverrides::default()));
        self.selection.format = format;
        self.selection.style = style;
    }

    pub(crate) fn text_mut(&mut self, leaf: usize) -> Result<&mut TextBlock, EditorError> {
        self.document
            .leaf_mut(leaf)
            .ok_or(EditorError::SelectionOutOfBounds { leaf, offset: 0 })
    }

    pub(crate) fn leaf_len(&self, leaf: usize) -> Result<usize, EditorError> {
        self.document
            .leaf_len(leaf)
            .ok_or(EditorError::SelectionOutOfBounds { leaf, offset: 0 })
    }
}
