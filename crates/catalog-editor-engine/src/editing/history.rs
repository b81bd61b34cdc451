//! # Undo/Redo History
//!
//! Snapshot-based history of committed editor states.
//!
//! - Every committed change records the state it replaced
//! - Undo swaps the current state with the most recent recorded one and keeps
//!   the current state for redo
//! - Any new change clears the redo stack
//! - Consecutive changes with the same [`MergeTag`] (typing) collapse into one
//!   undo step; any other commit (including one that leaves the document
//!   unchanged), undo, redo or caret move ends the group

use std::rc::Rc;

use crate::editing::state::EditorState;

/// Default number of undo levels kept
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Kind of change that may be merged with its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeTag {
    Typing,
}

#[derive(Debug)]
struct Entry {
    state: Rc<EditorState>,
    tag: Option<MergeTag>,
}

#[derive(Debug)]
pub struct History {
    /// States to return to (most recent last)
    undo_stack: Vec<Entry>,

    /// States undone (most recent last)
    redo_stack: Vec<Rc<EditorState>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_depth: usize,

    /// Open merge group, if the last change can absorb the next one
    open_group: Option<MergeTag>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
            open_group: None,
        }
    }

    /// Record `previous` as the state before a committed change
    pub fn record(&mut self, previous: Rc<EditorState>, tag: Option<MergeTag>) {
        self.redo_stack.clear();

        let merges = tag.is_some()
            && self.open_group == tag
            && self.undo_stack.last().is_some_and(|entry| entry.tag == tag);
        self.open_group = tag;
        if merges {
            return;
        }

        self.undo_stack.push(Entry {
            state: previous,
            tag,
        });
        if self.max_depth > 0 && self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Close the open merge group so the next change starts a new step
    pub fn break_group(&mut self) {
        self.open_group = None;
    }

    /// Step back; `current` becomes available to redo
    pub fn undo(&mut self, current: Rc<EditorState>) -> Option<Rc<EditorState>> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.open_group = None;
        Some(entry.state)
    }

    /// Step forward again; `current` becomes available to undo
    pub fn redo(&mut self, current: Rc<EditorState>) -> Option<Rc<EditorState>> {
        let state = self.redo_stack.pop()?;
        self.undo_stack.push(Entry {
            state: current,
            tag: None,
        });
        self.open_group = None;
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::Document;
    use crate::editing::node::Block;

    fn state(text: &str) -> Rc<EditorState> {
        Rc::new(EditorState::new(Document::from_blocks(vec![
            Block::paragraph(text),
        ])))
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::default();
        history.record(state("a"), None);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        let restored = history.undo(state("b")).expect("Should undo");
        assert_eq!(restored.document.plain_text(), "a");
        assert!(history.can_redo());

        let again = history.redo(state("a")).expect("Should redo");
        assert_eq!(again.document.plain_text(), "b");
        assert!(history.can_undo());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut history = History::default();
        history.record(state("a"), None);
        history.undo(state("b"));
        history.record(state("a"), None);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_typing_merges_until_group_breaks() {
        let mut history = History::default();
        history.record(state(""), Some(MergeTag::Typing));
        history.record(state("h"), Some(MergeTag::Typing));
        history.record(state("hi"), Some(MergeTag::Typing));
        assert_eq!(history.undo_depth(), 1);

        history.break_group();
        history.record(state("hi!"), Some(MergeTag::Typing));
        assert_eq!(history.undo_depth(), 2);

        history.record(state("hi!!"), None);
        history.record(state("hi!!?"), Some(MergeTag::Typing));
        assert_eq!(history.undo_depth(), 4);
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut history = History::with_max_depth(2);
        for text in ["1", "2", "3"] {
            history.record(state(text), None);
        }
        assert_eq!(history.undo_depth(), 2);
        let oldest = history
            .undo(state("4"))
            .and_then(|_| history.undo(state("3")))
            .expect("Should undo twice");
        assert_eq!(oldest.document.plain_text(), "2");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_depth_is_unlimited() {
        let mut history = History::with_max_depth(0);
        for i in 0..150 {
            history.record(state(&i.to_string()), None);
        }
        assert_eq!(history.undo_depth(), 150);
    }
}
