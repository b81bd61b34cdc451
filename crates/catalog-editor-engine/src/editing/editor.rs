//! The editor: current snapshot, history and event listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, error};

use crate::EditorError;
use crate::editing::commands::Cmd;
use crate::editing::document::Document;
use crate::editing::history::{History, MergeTag};
use crate::editing::patch::Patch;
use crate::editing::selection::Selection;
use crate::editing::state::EditorState;

/// What listeners see after an event
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: Rc<EditorState>,
    pub version: u64,
    pub can_undo: bool,
    pub can_redo: bool,
}

type SelectionListener = Rc<RefCell<dyn FnMut(&Snapshot)>>;
type UpdateListener = Rc<RefCell<dyn FnMut(&Snapshot, &Patch)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    selection: Vec<(u64, SelectionListener)>,
    update: Vec<(u64, UpdateListener)>,
}

impl Registry {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        self.selection.retain(|(listener_id, _)| *listener_id != id);
        self.update.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Listener registration; dropping it removes the listener
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Owns the current [`EditorState`] and turns commands into committed
/// snapshots.
///
/// Writes go through [`Editor::update`] (or [`Editor::dispatch`]): the closure
/// edits a draft copy; on success the draft becomes the new snapshot, the
/// version is bumped, history records the replaced state when the document
/// changed, and update listeners are notified. On failure the draft is
/// dropped and nothing is notified.
pub struct Editor {
    state: Rc<EditorState>,
    history: History,
    version: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self::with_history(document, History::default())
    }

    pub fn with_history(document: Document, history: History) -> Self {
        Self {
            state: Rc::new(EditorState::new(document)),
            history,
            version: 0,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state(&self) -> Rc<EditorState> {
        Rc::clone(&self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            version: self.version,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Read the current state
    pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.state)
    }

    /// Run `f` on a draft of the current state and commit it on success
    pub fn update<F>(&mut self, f: F) -> Result<Patch, EditorError>
    where
        F: FnOnce(&mut EditorState) -> Result<(), EditorError>,
    {
        self.transact(None, f)
    }

    /// Apply one command as its own transaction
    pub fn dispatch(&mut self, cmd: Cmd) -> Result<Patch, EditorError> {
        debug!("dispatch {cmd:?}");
        match cmd {
            Cmd::Undo => Ok(self.undo()),
            Cmd::Redo => Ok(self.redo()),
            cmd => self.transact(cmd.merge_tag(), |state| state.apply(&cmd)),
        }
    }

    /// Apply several commands as a single transaction: one history step and
    /// one update event
    pub fn dispatch_all(&mut self, cmds: &[Cmd]) -> Result<Patch, EditorError> {
        debug!("dispatch_all {cmds:?}");
        self.transact(None, |state| {
            cmds.iter().try_for_each(|cmd| state.apply(cmd))
        })
    }

    /// Move the selection. Pending marks are reset from the text at the new
    /// caret and the typing group is closed.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.state.check_selection(&selection)?;

        let mut next = EditorState {
            document: self.state.document.clone(),
            selection,
        };
        next.refresh_marks();
        self.state = Rc::new(next);
        self.history.break_group();

        let snapshot = self.snapshot();
        let listeners: Vec<SelectionListener> = self
            .registry
            .borrow()
            .selection
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            (listener.borrow_mut())(&snapshot);
        }
        Ok(())
    }

    pub fn undo(&mut self) -> Patch {
        let current = self.state();
        match self.history.undo(Rc::clone(&current)) {
            Some(previous) => self.replace_state(previous, true),
            None => {
                debug!("undo: history is empty");
                self.replace_state(current, false)
            }
        }
    }

    pub fn redo(&mut self) -> Patch {
        let current = self.state();
        match self.history.redo(Rc::clone(&current)) {
            Some(next) => self.replace_state(next, true),
            None => {
                debug!("redo: nothing to redo");
                self.replace_state(current, false)
            }
        }
    }

    pub fn on_selection_change(&self, listener: impl FnMut(&Snapshot) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        let listener: SelectionListener = Rc::new(RefCell::new(listener));
        registry.selection.push((id, listener));
        self.subscription(id)
    }

    pub fn on_update(&self, listener: impl FnMut(&Snapshot, &Patch) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        let listener: UpdateListener = Rc::new(RefCell::new(listener));
        registry.update.push((id, listener));
        self.subscription(id)
    }

    pub fn listener_count(&self) -> usize {
        let registry = self.registry.borrow();
        registry.selection.len() + registry.update.len()
    }

    fn subscription(&self, id: u64) -> Subscription {
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    fn transact<F>(&mut self, tag: Option<MergeTag>, f: F) -> Result<Patch, EditorError>
    where
        F: FnOnce(&mut EditorState) -> Result<(), EditorError>,
    {
        let mut draft = (*self.state).clone();
        if let Err(err) = f(&mut draft) {
            error!("editor update discarded: {err}");
            return Err(err);
        }

        let changed = draft.document != self.state.document;
        let previous = std::mem::replace(&mut self.state, Rc::new(draft));
        if changed {
            self.history.record(previous, tag);
        } else {
            self.history.break_group();
        }
        Ok(self.notify_update(changed))
    }

    fn replace_state(&mut self, state: Rc<EditorState>, changed: bool) -> Patch {
        self.state = state;
        self.notify_update(changed)
    }

    fn notify_update(&mut self, changed: bool) -> Patch {
        self.version += 1;
        let patch = Patch {
            changed,
            new_selection: self.state.selection.clone(),
            version: self.version,
        };

        let snapshot = self.snapshot();
        let listeners: Vec<UpdateListener> = self
            .registry
            .borrow()
            .update
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            (listener.borrow_mut())(&snapshot, &patch);
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::node::{Block, HeadingLevel, TextFormat};
    use crate::editing::selection::Point;
    use pretty_assertions::assert_eq;

    fn editor(blocks: Vec<Block>) -> Editor {
        Editor::new(Document::from_blocks(blocks))
    }

    #[test]
    fn test_read_sees_committed_state() {
        let mut editor = editor(vec![Block::paragraph("")]);
        editor
            .dispatch(Cmd::InsertText("hello".into()))
            .expect("Should insert");
        let text = editor.read(|state| state.document.plain_text());
        assert_eq!(text, "hello");
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_failed_update_leaves_state_untouched() {
        let mut editor = editor(vec![Block::paragraph("abc")]);
        let before = editor.state();
        let result = editor.update(|state| {
            state.apply(&Cmd::InsertText("x".into()))?;
            Err(EditorError::InvalidHeadingLevel(9))
        });
        assert_eq!(result, Err(EditorError::InvalidHeadingLevel(9)));
        assert_eq!(*editor.state(), *before);
        assert_eq!(editor.version(), 0);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_undo_redo_restore_document() {
        let mut editor = editor(vec![Block::paragraph("Title")]);
        editor
            .dispatch(Cmd::SetBlock(crate::editing::node::BlockTarget::Heading(
                HeadingLevel::H1,
            )))
            .expect("Should set block");
        assert!(editor.can_undo());

        let patch = editor.dispatch(Cmd::Undo).expect("Should undo");
        assert!(patch.changed);
        assert_eq!(editor.state().document.blocks(), &[Block::paragraph("Title")]);
        assert!(editor.can_redo());

        editor.redo();
        assert_eq!(
            editor.state().document.blocks(),
            &[Block::heading(HeadingLevel::H1, "Title")]
        );
    }

    #[test]
    fn test_typing_is_one_undo_step() {
        let mut editor = editor(vec![Block::paragraph("")]);
        for ch in ["a", "b", "c"] {
            editor.dispatch(Cmd::InsertText(ch.into())).expect("Should type");
        }
        editor.undo();
        assert_eq!(editor.state().document.plain_text(), "");
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_caret_move_breaks_typing_group() {
        let mut editor = editor(vec![Block::paragraph("")]);
        editor.dispatch(Cmd::InsertText("ab".into())).expect("Should type");
        editor
            .set_selection(Selection::caret(0, 1))
            .expect("Should move caret");
        editor.dispatch(Cmd::InsertText("X".into())).expect("Should type");

        editor.undo();
        assert_eq!(editor.state().document.plain_text(), "ab");
    }

    #[test]
    fn test_pending_format_toggle_commits_without_history() {
        let mut editor = editor(vec![Block::paragraph("")]);
        let patch = editor
            .dispatch(Cmd::ToggleFormat(TextFormat::Bold))
            .expect("Should toggle");
        assert!(!patch.changed);
        assert_eq!(patch.version, 1);
        assert!(!editor.can_undo());
        assert!(editor.state().selection.format.contains(TextFormat::Bold));
    }

    #[test]
    fn test_pending_format_toggle_breaks_typing_group() {
        let mut editor = editor(vec![Block::paragraph("")]);
        editor
            .dispatch(Cmd::InsertText("Play".into()))
            .expect("Should type");
        editor
            .dispatch(Cmd::ToggleFormat(TextFormat::Bold))
            .expect("Should toggle");
        editor.dispatch(Cmd::InsertText("!".into())).expect("Should type");
        assert_eq!(editor.state().document.plain_text(), "Play!");

        editor.undo();
        assert_eq!(editor.state().document.plain_text(), "Play");
        assert!(editor.can_undo());
    }

    #[test]
    fn test_dispatch_all_is_one_event_and_one_step() {
        let mut editor = editor(vec![Block::list(
            crate::editing::node::ListKind::Ordered,
            ["item"],
        )]);
        let events = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&events);
        let _subscription = editor.on_update(move |_, _| *counter.borrow_mut() += 1);

        editor
            .dispatch_all(&[
                Cmd::RemoveList,
                Cmd::SetBlock(crate::editing::node::BlockTarget::Quote),
            ])
            .expect("Should apply");
        assert_eq!(*events.borrow(), 1);
        assert_eq!(editor.state().document.blocks(), &[Block::quote("item")]);

        editor.undo();
        assert_eq!(
            editor.state().document.blocks(),
            &[Block::list(crate::editing::node::ListKind::Ordered, ["item"])]
        );
    }

    #[test]
    fn test_set_selection_validates_and_notifies() {
        let mut editor = editor(vec![Block::paragraph("abc")]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = editor.on_selection_change(move |snapshot| {
            sink.borrow_mut().push(snapshot.state.selection.focus);
        });

        editor
            .set_selection(Selection::caret(0, 2))
            .expect("Should move");
        assert!(editor.set_selection(Selection::caret(0, 4)).is_err());
        assert_eq!(*seen.borrow(), vec![Point::new(0, 2)]);
    }

    #[test]
    fn test_dropped_subscription_stops_events() {
        let mut editor = editor(vec![Block::paragraph("")]);
        let events = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&events);
        let subscription = editor.on_update(move |_, _| *counter.borrow_mut() += 1);
        assert_eq!(editor.listener_count(), 1);

        editor.dispatch(Cmd::InsertText("a".into())).expect("Should type");
        drop(subscription);
        assert_eq!(editor.listener_count(), 0);
        editor.dispatch(Cmd::InsertText("b".into())).expect("Should type");

        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_subscription_outliving_editor_is_harmless() {
        let editor = editor(vec![Block::paragraph("")]);
        let subscription = editor.on_selection_change(|_| {});
        drop(editor);
        drop(subscription);
    }
}
