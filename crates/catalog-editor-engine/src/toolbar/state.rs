use serde::Serialize;

use crate::editing::{Alignment, FormatFlags, HeadingLevel, LeafKind, ListKind, TextFormat};

/// Block type shown in the toolbar's block selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    List(ListKind),
}

impl BlockType {
    pub fn label(self) -> String {
        match self {
            BlockType::Paragraph => "Normal".to_string(),
            BlockType::Heading(level) => format!("Heading {}", level.level()),
            BlockType::Quote => "Quote".to_string(),
            BlockType::List(ListKind::Unordered) => "Bullet List".to_string(),
            BlockType::List(ListKind::Ordered) => "Numbered List".to_string(),
        }
    }
}

impl From<LeafKind> for BlockType {
    fn from(kind: LeafKind) -> Self {
        match kind {
            LeafKind::ListItem(list) => BlockType::List(list),
            LeafKind::Heading(level) => BlockType::Heading(level),
            LeafKind::Quote => BlockType::Quote,
            LeafKind::Paragraph => BlockType::Paragraph,
        }
    }
}

/// Everything the toolbar needs to render its active/disabled states
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub active_formats: FormatFlags,
    pub block_type: BlockType,
    pub is_link: bool,
    /// Font size common to the selection; `None` when unset or mixed
    pub font_size: Option<String>,
    /// Font family common to the selection; `None` when unset or mixed
    pub font_family: Option<String>,
    pub alignment: Alignment,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ToolbarState {
    pub fn is_active(&self, format: TextFormat) -> bool {
        self.active_formats.contains(format)
    }
}
