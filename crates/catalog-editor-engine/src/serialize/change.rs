use log::trace;

use crate::editing::{Editor, Subscription};
use crate::serialize::html::HtmlSerializer;

/// Emits the document's HTML to a host callback after every committed update.
///
/// Every update event produces exactly one callback, including undo, redo
/// and commits that left the document unchanged.
pub struct ChangeSerializer {
    _subscription: Subscription,
}

impl ChangeSerializer {
    pub fn attach(
        editor: &Editor,
        serializer: HtmlSerializer,
        mut on_change: impl FnMut(String) + 'static,
    ) -> Self {
        let subscription = editor.on_update(move |snapshot, patch| {
            let html = serializer.serialize(&snapshot.state.document);
            trace!("v{} serialized to {} bytes", patch.version, html.len());
            on_change(html);
        });
        Self {
            _subscription: subscription,
        }
    }
}
