use crate::editing::selection::Selection;

/// Result of a committed update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Whether the document differs from the previous snapshot
    pub changed: bool,
    pub new_selection: Selection,
    pub version: u64,
}
