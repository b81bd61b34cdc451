//! Editing commands and how they transform an [`EditorState`].

use log::debug;

use crate::EditorError;
use crate::editing::history::MergeTag;
use crate::editing::node::{
    Alignment, BlockTarget, Embed, LinkAttrs, ListKind, Span, StyleProperty, TextFormat, TextRun,
};
use crate::editing::selection::{Point, Selection};
use crate::editing::state::EditorState;

/// One-shot mutation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Insert text at the caret, replacing a range selection. `\n` splits
    /// the block.
    InsertText(String),
    /// Backspace
    DeleteBackward,
    /// Enter
    SplitBlock,
    ToggleFormat(TextFormat),
    SetStyle {
        property: StyleProperty,
        value: String,
    },
    SetAlignment(Alignment),
    SetBlock(BlockTarget),
    InsertList(ListKind),
    RemoveList,
    ApplyLink(LinkAttrs),
    RemoveLink,
    InsertEmbed(Embed),
    Undo,
    Redo,
}

impl Cmd {
    /// Consecutive commands with the same tag share one history entry
    pub(crate) fn merge_tag(&self) -> Option<MergeTag> {
        match self {
            Cmd::InsertText(_) => Some(MergeTag::Typing),
            _ => None,
        }
    }
}

impl EditorState {
    /// Apply a command in place. Undo and redo need the history and are
    /// rejected here.
    pub fn apply(&mut self, cmd: &Cmd) -> Result<(), EditorError> {
        self.check_selection(&self.selection)?;

        match cmd {
            Cmd::InsertText(text) => self.insert_text(text),
            Cmd::DeleteBackward => self.delete_backward(),
            Cmd::SplitBlock => {
                self.delete_selected()?;
                let caret = self.selection.start();
                let leaf = self
                    .document
                    .split_leaf(caret.leaf, caret.offset)
                    .ok_or(EditorError::SelectionOutOfBounds {
                        leaf: caret.leaf,
                        offset: caret.offset,
                    })?;
                self.selection.collapse_to(Point::new(leaf, 0));
                Ok(())
            }
            Cmd::ToggleFormat(format) => self.toggle_format(*format),
            Cmd::SetStyle { property, value } => self.set_style(*property, value),
            Cmd::SetAlignment(align) => {
                for leaf in self.selection.leaves() {
                    self.text_mut(leaf)?.align = *align;
                }
                Ok(())
            }
            Cmd::SetBlock(target) => {
                let converted = self.document.set_block(&self.selection.leaves(), *target);
                if converted == 0 {
                    debug!("set-block {target:?}: no paragraph, heading or quote selected");
                }
                Ok(())
            }
            Cmd::InsertList(kind) => {
                self.document.insert_list(&self.selection.leaves(), *kind);
                Ok(())
            }
            Cmd::RemoveList => {
                self.document.remove_list(&self.selection.leaves());
                Ok(())
            }
            Cmd::ApplyLink(attrs) => self.apply_link(attrs),
            Cmd::RemoveLink => {
                let mut changed = false;
                for leaf in self.selection.leaves() {
                    let range = self.selection.range_in_leaf(leaf, self.leaf_len(leaf)?);
                    changed |= self.text_mut(leaf)?.unlink(range);
                }
                if !changed {
                    debug!("remove-link: selection touches no link");
                }
                Ok(())
            }
            Cmd::InsertEmbed(embed) => {
                self.delete_selected()?;
                let caret = self.selection.start();
                let leaf = self
                    .document
                    .insert_embed(caret.leaf, caret.offset, embed.clone())
                    .ok_or(EditorError::SelectionOutOfBounds {
                        leaf: caret.leaf,
                        offset: caret.offset,
                    })?;
                self.selection.collapse_to(Point::new(leaf, 0));
                self.refresh_marks();
                Ok(())
            }
            Cmd::Undo | Cmd::Redo => Err(EditorError::HistoryOutsideEditor),
        }
    }

    fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.delete_selected()?;

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                let caret = self.selection.focus;
                let leaf = self
                    .document
                    .split_leaf(caret.leaf, caret.offset)
                    .ok_or(EditorError::SelectionOutOfBounds {
                        leaf: caret.leaf,
                        offset: caret.offset,
                    })?;
                self.selection.collapse_to(Point::new(leaf, 0));
            }
            if line.is_empty() {
                continue;
            }

            let caret = self.selection.focus;
            let run = TextRun {
                text: line.to_string(),
                format: self.selection.format,
                style: self.selection.style.clone(),
            };
            let len = run.char_len();
            let block = self.text_mut(caret.leaf)?;
            let link = block.link_around(caret.offset);
            block.insert(caret.offset, Span { run, link });
            self.selection
                .collapse_to(Point::new(caret.leaf, caret.offset + len));
        }
        Ok(())
    }

    fn delete_backward(&mut self) -> Result<(), EditorError> {
        if !self.selection.is_collapsed() {
            self.delete_selected()?;
            self.refresh_marks();
            return Ok(());
        }

        let caret = self.selection.focus;
        if caret.offset > 0 {
            self.text_mut(caret.leaf)?
                .delete(caret.offset - 1..caret.offset);
            self.selection
                .collapse_to(Point::new(caret.leaf, caret.offset - 1));
        } else if self.document.remove_embed_before(caret.leaf) {
            debug!("delete-backward: removed embed before leaf {}", caret.leaf);
        } else if self
            .document
            .locate(caret.leaf)
            .is_some_and(|path| path.item.is_some())
        {
            self.document.remove_list(&(caret.leaf..=caret.leaf));
        } else if caret.leaf > 0 {
            let previous = caret.leaf - 1;
            let previous_len = self.leaf_len(previous)?;
            let content = self.text_mut(caret.leaf)?.clone();
            self.document.remove_leaves(&(caret.leaf..=caret.leaf));
            self.text_mut(previous)?.append(content);
            self.selection
                .collapse_to(Point::new(previous, previous_len));
        } else {
            debug!("delete-backward: caret at document start");
        }

        self.refresh_marks();
        Ok(())
    }

    /// Delete the selected range and collapse to its start
    fn delete_selected(&mut self) -> Result<(), EditorError> {
        if self.selection.is_collapsed() {
            return Ok(());
        }
        let (start, end) = (self.selection.start(), self.selection.end());

        if start.leaf == end.leaf {
            self.text_mut(start.leaf)?.delete(start.offset..end.offset);
        } else {
            let tail = self.text_mut(end.leaf)?.split_off(end.offset);
            self.text_mut(start.leaf)?.split_off(start.offset);
            self.document.remove_leaves(&(start.leaf + 1..=end.leaf));
            self.text_mut(start.leaf)?.append(tail);
        }

        self.selection.collapse_to(start);
        Ok(())
    }

    fn toggle_format(&mut self, format: TextFormat) -> Result<(), EditorError> {
        let spans = self.selected_spans();
        if spans.is_empty() {
            self.selection.format.toggle(format);
            return Ok(());
        }

        let enable = !spans.iter().all(|span| span.run.format.contains(format));
        for leaf in self.selection.leaves() {
            let range = self.selection.range_in_leaf(leaf, self.leaf_len(leaf)?);
            self.text_mut(leaf)?
                .map_range(range, |span| span.run.format.set(format, enable));
        }
        self.selection.format.set(format, enable);
        Ok(())
    }

    fn set_style(&mut self, property: StyleProperty, value: &str) -> Result<(), EditorError> {
        self.selection.style.set(property, value);
        if self.selection.is_collapsed() {
            return Ok(());
        }
        for leaf in self.selection.leaves() {
            let range = self.selection.range_in_leaf(leaf, self.leaf_len(leaf)?);
            self.text_mut(leaf)?
                .map_range(range, |span| span.run.style.set(property, value));
        }
        Ok(())
    }

    fn apply_link(&mut self, attrs: &LinkAttrs) -> Result<(), EditorError> {
        if self.selection.is_collapsed() {
            let caret = self.selection.focus;
            let run = TextRun {
                text: attrs.url.clone(),
                format: self.selection.format,
                style: self.selection.style.clone(),
            };
            let len = run.char_len();
            self.text_mut(caret.leaf)?.insert(
                caret.offset,
                Span {
                    run,
                    link: Some(attrs.clone()),
                },
            );
            self.selection = Selection {
                anchor: caret,
                focus: Point::new(caret.leaf, caret.offset + len),
                ..self.selection.clone()
            };
            return Ok(());
        }

        for leaf in self.selection.leaves() {
            let range = self.selection.range_in_leaf(leaf, self.leaf_len(leaf)?);
            self.text_mut(leaf)?
                .map_range(range, |span| span.link = Some(attrs.clone()));
        }
        Ok(())
    }
}
