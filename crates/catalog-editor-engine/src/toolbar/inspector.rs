//! Selection classification: derive the toolbar state from an editor state.

use crate::editing::{EditorState, FormatFlags, Snapshot, Span, StyleProperty, TextFormat};
use crate::toolbar::state::{BlockType, ToolbarState};

/// Classify the selection of `state`. History availability is left unset.
pub fn classify(state: &EditorState) -> ToolbarState {
    let spans = state.selected_spans();
    let anchor = state.anchor_leaf();

    let (active_formats, font_family, font_size) = if spans.is_empty() {
        let pending = &state.selection;
        (
            pending.format,
            pending.style.font_family.clone(),
            pending.style.font_size.clone(),
        )
    } else {
        (
            uniform_formats(&spans),
            uniform_style(&spans, StyleProperty::FontFamily),
            uniform_style(&spans, StyleProperty::FontSize),
        )
    };

    ToolbarState {
        active_formats,
        block_type: anchor
            .map(|leaf| BlockType::from(leaf.kind))
            .unwrap_or_default(),
        is_link: state
            .span_at_start()
            .is_some_and(|span| span.link.is_some()),
        font_size,
        font_family,
        alignment: anchor.map(|leaf| leaf.content.align).unwrap_or_default(),
        can_undo: false,
        can_redo: false,
    }
}

/// Classify a listener snapshot, including history availability
pub fn inspect(snapshot: &Snapshot) -> ToolbarState {
    ToolbarState {
        can_undo: snapshot.can_undo,
        can_redo: snapshot.can_redo,
        ..classify(&snapshot.state)
    }
}

/// Formats carried by every span
fn uniform_formats(spans: &[Span]) -> FormatFlags {
    TextFormat::ALL
        .into_iter()
        .filter(|format| spans.iter().all(|span| span.run.format.contains(*format)))
        .collect()
}

/// Style value shared by every span, if any
fn uniform_style(spans: &[Span], property: StyleProperty) -> Option<String> {
    let first = spans.first()?.run.style.get(property)?;
    spans
        .iter()
        .all(|span| span.run.style.get(property) == Some(first))
        .then(|| first.to_string())
}
