/*!
 * # Editing Core Module
 *
 * Headless rich-text editing engine behind the description editor.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable Snapshots
 * - The current content is an **`EditorState`**: a `Document` plus a `Selection`
 * - Committed states are shared as `Rc<EditorState>` and never mutated again
 * - Hosts read through `Editor::read` or the `Snapshot` handed to listeners
 *
 * ### 2. Command-Based Editing
 * - All edits are **Commands** (`Cmd` enum) applied to a draft state
 * - `Editor::update` / `Editor::dispatch` commit the draft only if every
 *   command succeeds; a failed transaction leaves the editor untouched
 * - `Editor::dispatch_all` groups commands into one transaction
 *
 * ### 3. Leaf Addressing
 * - Paragraphs, headings, quotes and list items are **text leaves**, numbered
 *   in document order; embeds are not leaves
 * - A selection point is (leaf index, character offset)
 * - Block-type changes convert leaves one to one, so a selection stays valid
 *   across them
 *
 * ### 4. History
 * - Snapshot-based undo/redo with a bounded depth
 * - Consecutive typing is merged into one undo step
 *
 * ### 5. Events
 * - Selection-change and update listeners, registered through
 *   `Editor::on_selection_change` and `Editor::on_update`
 * - Each registration returns a `Subscription` that deregisters on drop
 *
 * ## Usage Pattern
 *
 * ```rust
 * use catalog_editor_engine::editing::*;
 *
 * let mut editor = Editor::new(Document::from_blocks(vec![Block::paragraph("")]));
 *
 * let _sub = editor.on_update(|snapshot, patch| {
 *     println!("v{}: {}", patch.version, snapshot.state.document.plain_text());
 * });
 *
 * editor.dispatch(Cmd::InsertText("Hello".to_string())).unwrap();
 * editor.dispatch(Cmd::SetBlock(BlockTarget::Heading(HeadingLevel::H1))).unwrap();
 * editor.undo();
 * ```
 */

pub mod commands;
pub mod document;
pub mod editor;
pub mod history;
pub mod node;
pub mod patch;
pub mod selection;
pub mod state;

pub use commands::Cmd;
pub use document::{Document, Leaf, LeafKind, LeafPath};
pub use editor::{Editor, Snapshot, Subscription};
pub use history::{DEFAULT_HISTORY_DEPTH, History, MergeTag};
pub use node::{
    Alignment, Block, BlockTarget, Embed, EmbedPlatform, FormatFlags, HeadingLevel, Inline,
    LinkAttrs, LinkRel, LinkTarget, ListKind, Span, StyleOverrides, StyleProperty, TextBlock,
    TextFormat, TextRun,
};
pub use patch::Patch;
pub use selection::{Point, Selection};
pub use state::EditorState;
