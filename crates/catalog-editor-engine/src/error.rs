use thiserror::Error;

/// Errors reported by the editing engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("selection point {leaf}:{offset} is outside the document")]
    SelectionOutOfBounds { leaf: usize, offset: usize },

    #[error("invalid heading level {0} (expected 1-6)")]
    InvalidHeadingLevel(u8),

    #[error("undo/redo must go through the editor history")]
    HistoryOutsideEditor,
}
