//! The game-description editor: an [`Editor`] wired to a toolbar store and a
//! change serializer, as one unit a host form can embed.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::EditorError;
use crate::editing::{Cmd, Document, Editor, History, Patch, Selection, DEFAULT_HISTORY_DEPTH};
use crate::serialize::{ChangeSerializer, HtmlSerializer, HtmlTheme};
use crate::toolbar::{DispatchOutcome, ToolbarAction, ToolbarState, ToolbarStore, UserPrompt, dispatch};

pub const DEFAULT_NAMESPACE: &str = "GameDescriptionEditor";
pub const PLACEHOLDER: &str = "Write your blog post content...";

#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Name used in log output
    pub namespace: String,
    pub history_depth: usize,
    pub theme: HtmlTheme,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            theme: HtmlTheme::catalog(),
        }
    }
}

pub struct DescriptionEditor {
    editor: Editor,
    toolbar: ToolbarStore,
    _serializer: ChangeSerializer,
    html: Rc<RefCell<String>>,
    namespace: String,
}

impl DescriptionEditor {
    /// Create the editor; `on_change` receives the document's HTML after
    /// every committed update
    pub fn new(
        document: Document,
        options: EditorOptions,
        mut on_change: impl FnMut(String) + 'static,
    ) -> Self {
        let serializer = HtmlSerializer::new(options.theme);
        let editor = Editor::with_history(document, History::with_max_depth(options.history_depth));

        let html = Rc::new(RefCell::new(serializer.serialize(&editor.state().document)));
        let latest = Rc::clone(&html);
        let change = ChangeSerializer::attach(&editor, serializer, move |markup| {
            latest.borrow_mut().clone_from(&markup);
            on_change(markup);
        });
        let toolbar = ToolbarStore::attach(&editor);

        info!("{}: editor ready", options.namespace);
        Self {
            editor,
            toolbar,
            _serializer: change,
            html,
            namespace: options.namespace,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn toolbar(&self) -> ToolbarState {
        self.toolbar.state()
    }

    /// Markup of the current document
    pub fn html(&self) -> String {
        self.html.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.editor
            .read(|state| state.document.leaf_count() == 1 && state.document.plain_text().is_empty())
    }

    /// Run a toolbar action
    pub fn perform(&mut self, action: ToolbarAction, prompt: &mut dyn UserPrompt) -> DispatchOutcome {
        dispatch(&mut self.editor, action, prompt)
    }

    /// Run a text-editing command typed by the user
    pub fn command(&mut self, cmd: Cmd) -> Result<Patch, EditorError> {
        self.editor.dispatch(cmd)
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.editor.set_selection(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Block, TextFormat};
    use crate::toolbar::BlockType;

    struct NoPrompt;

    impl UserPrompt for NoPrompt {
        fn prompt(&mut self, _message: &str) -> Option<String> {
            None
        }

        fn alert(&mut self, _message: &str) {}
    }

    #[test]
    fn test_html_tracks_every_change() {
        let outputs = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outputs);
        let mut editor = DescriptionEditor::new(
            Document::new(),
            EditorOptions::default(),
            move |html| sink.borrow_mut().push(html),
        );
        assert!(editor.is_empty());
        assert_eq!(editor.html(), "<p><br></p>");

        editor
            .command(Cmd::InsertText("Play".into()))
            .expect("Should type");
        editor.perform(ToolbarAction::ToggleFormat(TextFormat::Bold), &mut NoPrompt);
        editor.command(Cmd::InsertText("!".into())).expect("Should type");

        assert_eq!(editor.html(), "<p>Play<strong class=\"font-bold\">!</strong></p>");
        assert_eq!(outputs.borrow().len(), 3);
        assert!(editor.toolbar().is_active(TextFormat::Bold));
    }

    #[test]
    fn test_toolbar_reflects_block_changes() {
        let mut editor = DescriptionEditor::new(
            Document::from_blocks(vec![Block::paragraph("Title")]),
            EditorOptions::default(),
            |_| {},
        );
        editor.perform(
            ToolbarAction::SetBlockType(BlockType::Quote),
            &mut NoPrompt,
        );
        assert_eq!(editor.toolbar().block_type, BlockType::Quote);
        assert!(editor.toolbar().can_undo);
        assert_eq!(editor.namespace(), DEFAULT_NAMESPACE);
    }
}
