use std::cell::RefCell;
use std::rc::Rc;

use crate::editing::{Editor, Snapshot, Subscription};
use crate::toolbar::inspector::inspect;
use crate::toolbar::state::ToolbarState;

#[derive(Debug, Default)]
struct Inner {
    state: ToolbarState,
    revision: u64,
}

impl Inner {
    fn refresh(&mut self, snapshot: &Snapshot) {
        self.state = inspect(snapshot);
        self.revision += 1;
    }
}

/// Latest toolbar state, kept in sync with an editor.
///
/// Recomputed on every selection-change and update event of the editor it is
/// attached to. Dropping the store deregisters both listeners.
#[derive(Debug)]
pub struct ToolbarStore {
    inner: Rc<RefCell<Inner>>,
    _subscriptions: [Subscription; 2],
}

impl ToolbarStore {
    pub fn attach(editor: &Editor) -> Self {
        let mut inner = Inner::default();
        inner.refresh(&editor.snapshot());
        let inner = Rc::new(RefCell::new(inner));

        let on_selection = Rc::clone(&inner);
        let on_update = Rc::clone(&inner);
        let subscriptions = [
            editor.on_selection_change(move |snapshot| on_selection.borrow_mut().refresh(snapshot)),
            editor.on_update(move |snapshot, _| on_update.borrow_mut().refresh(snapshot)),
        ];

        Self {
            inner,
            _subscriptions: subscriptions,
        }
    }

    pub fn state(&self) -> ToolbarState {
        self.inner.borrow().state.clone()
    }

    /// Number of recomputations so far, starting at 1 after attach
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }
}
