use std::ops::RangeInclusive;

use serde::Serialize;

use crate::editing::node::{Block, BlockTarget, Embed, HeadingLevel, ListKind, TextBlock};

/// What kind of block holds a text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    ListItem(ListKind),
}

/// Structural address of a text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafPath {
    /// Index of the top-level block
    pub block: usize,
    /// Item index when the leaf is a list item
    pub item: Option<usize>,
}

/// Read-only view of one text leaf
#[derive(Debug, Clone, Copy)]
pub struct Leaf<'a> {
    pub index: usize,
    pub path: LeafPath,
    pub kind: LeafKind,
    pub content: &'a TextBlock,
}

/// Rich-text document: an ordered list of blocks.
///
/// Invariants kept by [`Document::normalize`]:
/// - lists are never empty and adjacent lists of the same kind are merged
/// - there is always at least one text leaf
/// - the document never ends with an embed, so the caret can always be
///   placed after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: vec![Block::Paragraph(TextBlock::new())],
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn leaf_count(&self) -> usize {
        self.blocks.iter().map(Block::leaf_count).sum()
    }

    /// All text leaves in document order
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut leaves = Vec::new();
        for (block_index, block) in self.blocks.iter().enumerate() {
            let top_level = |kind, content| Leaf {
                index: 0,
                path: LeafPath {
                    block: block_index,
                    item: None,
                },
                kind,
                content,
            };
            match block {
                Block::Paragraph(content) => leaves.push(top_level(LeafKind::Paragraph, content)),
                Block::Heading { level, content } => {
                    leaves.push(top_level(LeafKind::Heading(*level), content))
                }
                Block::Quote(content) => leaves.push(top_level(LeafKind::Quote, content)),
                Block::List { kind, items } => {
                    for (item, content) in items.iter().enumerate() {
                        leaves.push(Leaf {
                            index: 0,
                            path: LeafPath {
                                block: block_index,
                                item: Some(item),
                            },
                            kind: LeafKind::ListItem(*kind),
                            content,
                        });
                    }
                }
                Block::Embed(_) => {}
            }
        }
        for (index, leaf) in leaves.iter_mut().enumerate() {
            leaf.index = index;
        }
        leaves
    }

    pub fn leaf(&self, index: usize) -> Option<Leaf<'_>> {
        self.leaves().into_iter().nth(index)
    }

    pub(crate) fn leaf_mut(&mut self, index: usize) -> Option<&mut TextBlock> {
        let mut seen = 0;
        for block in &mut self.blocks {
            match block {
                Block::Paragraph(content)
                | Block::Heading { content, .. }
                | Block::Quote(content) => {
                    if seen == index {
                        return Some(content);
                    }
                    seen += 1;
                }
                Block::List { items, .. } => {
                    if index < seen + items.len() {
                        return items.get_mut(index - seen);
                    }
                    seen += items.len();
                }
                Block::Embed(_) => {}
            }
        }
        None
    }

    pub fn leaf_len(&self, index: usize) -> Option<usize> {
        self.leaf(index).map(|leaf| leaf.content.char_len())
    }

    /// Plain text of all leaves, one line per leaf
    pub fn plain_text(&self) -> String {
        self.leaves()
            .iter()
            .map(|leaf| leaf.content.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace touched paragraphs, headings and quotes by `target`, keeping
    /// their inline content. List items are left alone: leaving a list is
    /// the job of [`Document::remove_list`].
    pub(crate) fn set_block(&mut self, leaves: &RangeInclusive<usize>, target: BlockTarget) -> usize {
        let mut seen = 0;
        let mut converted = 0;
        for block in &mut self.blocks {
            if block.text_content().is_none() {
                seen += block.leaf_count();
                continue;
            }
            if leaves.contains(&seen) {
                let taken = std::mem::replace(block, Block::Paragraph(TextBlock::new()));
                *block = target.build(taken.into_text_content().unwrap_or_default());
                converted += 1;
            }
            seen += 1;
        }
        converted
    }

    /// Turn touched text blocks into items of a `kind` list. Touched lists
    /// switch to `kind`; untouched blocks keep their type.
    pub(crate) fn insert_list(&mut self, leaves: &RangeInclusive<usize>, kind: ListKind) {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut pending: Vec<TextBlock> = Vec::new();
        let mut seen = 0;

        let flush = |out: &mut Vec<Block>, pending: &mut Vec<TextBlock>| {
            if !pending.is_empty() {
                out.push(Block::List {
                    kind,
                    items: std::mem::take(pending),
                });
            }
        };

        for block in std::mem::take(&mut self.blocks) {
            match block {
                Block::List {
                    kind: current,
                    items,
                } => {
                    let count = items.len();
                    let touched = (seen..seen + count).any(|leaf| leaves.contains(&leaf));
                    flush(&mut out, &mut pending);
                    out.push(Block::List {
                        kind: if touched { kind } else { current },
                        items,
                    });
                    seen += count;
                }
                Block::Embed(embed) => {
                    flush(&mut out, &mut pending);
                    out.push(Block::Embed(embed));
                }
                block => {
                    let touched = leaves.contains(&seen);
                    seen += 1;
                    if touched {
                        pending.extend(block.into_text_content());
                    } else {
                        flush(&mut out, &mut pending);
                        out.push(block);
                    }
                }
            }
        }
        flush(&mut out, &mut pending);

        self.blocks = out;
        self.normalize();
    }

    /// Turn touched list items into paragraphs, splitting their list around
    /// them. Items outside the selection stay in (shorter) lists.
    pub(crate) fn remove_list(&mut self, leaves: &RangeInclusive<usize>) -> usize {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut seen = 0;
        let mut removed = 0;

        for block in std::mem::take(&mut self.blocks) {
            match block {
                Block::List { kind, items } => {
                    let mut kept: Vec<TextBlock> = Vec::new();
                    for item in items {
                        if leaves.contains(&seen) {
                            if !kept.is_empty() {
                                out.push(Block::List {
                                    kind,
                                    items: std::mem::take(&mut kept),
                                });
                            }
                            out.push(Block::Paragraph(item));
                            removed += 1;
                        } else {
                            kept.push(item);
                        }
                        seen += 1;
                    }
                    if !kept.is_empty() {
                        out.push(Block::List { kind, items: kept });
                    }
                }
                block => {
                    seen += block.leaf_count();
                    out.push(block);
                }
            }
        }

        self.blocks = out;
        self.normalize();
        removed
    }

    /// Structural address of leaf `index`
    pub fn locate(&self, index: usize) -> Option<LeafPath> {
        self.leaf(index).map(|leaf| leaf.path)
    }

    /// Split leaf `index` at `offset` (Enter key). Returns the leaf holding
    /// the caret afterwards.
    ///
    /// An empty list item leaves its list instead of splitting.
    pub(crate) fn split_leaf(&mut self, index: usize, offset: usize) -> Option<usize> {
        let path = self.locate(index)?;
        match path.item {
            Some(item) => {
                let Block::List { items, .. } = &mut self.blocks[path.block] else {
                    return None;
                };
                if items[item].is_empty() {
                    self.remove_list(&(index..=index));
                    return Some(index);
                }
                let tail = items[item].split_off(offset);
                items.insert(item + 1, tail);
            }
            None => {
                let block = &mut self.blocks[path.block];
                let content = match block {
                    Block::Paragraph(content)
                    | Block::Heading { content, .. }
                    | Block::Quote(content) => content,
                    Block::List { .. } | Block::Embed(_) => return None,
                };
                let tail = content.split_off(offset);
                let next = match block {
                    Block::Heading { .. } if !tail.is_empty() => block.with_content(tail),
                    _ => Block::Paragraph(tail),
                };
                self.blocks.insert(path.block + 1, next);
            }
        }
        self.normalize();
        Some(index + 1)
    }

    /// Insert `embed` at `offset` of leaf `index`, splitting the surrounding
    /// block. Returns the leaf holding the caret afterwards (start of the
    /// text following the embed).
    pub(crate) fn insert_embed(&mut self, index: usize, offset: usize, embed: Embed) -> Option<usize> {
        let path = self.locate(index)?;
        let block = self.blocks.remove(path.block);
        let mut replacement = Vec::with_capacity(3);
        let head_kept;

        match (block, path.item) {
            (Block::List { kind, mut items }, Some(item)) => {
                let after = items.split_off(item + 1);
                let mut head = items.pop().unwrap_or_default();
                let tail = head.split_off(offset);
                head_kept = !head.is_empty();
                if head_kept {
                    items.push(head);
                }
                if !items.is_empty() {
                    replacement.push(Block::List { kind, items });
                }
                replacement.push(Block::Embed(embed));
                let mut rest = vec![tail];
                rest.extend(after);
                replacement.push(Block::List { kind, items: rest });
            }
            (block, _) => {
                let template = block.clone();
                let mut head = block.into_text_content().unwrap_or_default();
                let tail = head.split_off(offset);
                head_kept = !head.is_empty();
                if head_kept {
                    replacement.push(template.with_content(head));
                }
                replacement.push(Block::Embed(embed));
                replacement.push(if tail.is_empty() {
                    Block::Paragraph(tail)
                } else {
                    template.with_content(tail)
                });
            }
        }

        self.blocks.splice(path.block..path.block, replacement);
        self.normalize();
        Some(if head_kept { index + 1 } else { index })
    }

    /// Remove the leaves in `range` and every embed lying between them and
    /// the leaf before the range.
    pub(crate) fn remove_leaves(&mut self, range: &RangeInclusive<usize>) {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut seen = 0;

        for block in std::mem::take(&mut self.blocks) {
            match block {
                Block::List { kind, items } => {
                    let mut kept = Vec::with_capacity(items.len());
                    for item in items {
                        if !range.contains(&seen) {
                            kept.push(item);
                        }
                        seen += 1;
                    }
                    if !kept.is_empty() {
                        out.push(Block::List { kind, items: kept });
                    }
                }
                Block::Embed(embed) => {
                    if !range.contains(&seen) {
                        out.push(Block::Embed(embed));
                    }
                }
                block => {
                    if !range.contains(&seen) {
                        out.push(block);
                    }
                    seen += 1;
                }
            }
        }

        self.blocks = out;
        self.normalize();
    }

    /// Remove the embed directly before leaf `index`, if there is one
    pub(crate) fn remove_embed_before(&mut self, index: usize) -> bool {
        let Some(path) = self.locate(index) else {
            return false;
        };
        if path.item.is_some_and(|item| item > 0) || path.block == 0 {
            return false;
        }
        if matches!(self.blocks[path.block - 1], Block::Embed(_)) {
            self.blocks.remove(path.block - 1);
            self.normalize();
            return true;
        }
        false
    }

    /// Restore structural invariants
    pub(crate) fn normalize(&mut self) {
        let mut out: Vec<Block> = Vec::with_capacity(self.blocks.len());
        for block in std::mem::take(&mut self.blocks) {
            match block {
                Block::List { items, .. } if items.is_empty() => {}
                Block::List { kind, items } => match out.last_mut() {
                    Some(Block::List {
                        kind: previous,
                        items: previous_items,
                    }) if *previous == kind => previous_items.extend(items),
                    _ => out.push(Block::List { kind, items }),
                },
                block => out.push(block),
            }
        }

        if out.is_empty() || matches!(out.last(), Some(Block::Embed(_))) {
            out.push(Block::Paragraph(TextBlock::new()));
        }
        self.blocks = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::node::{TextFormat, TextRun};
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::from_blocks(vec![
            Block::heading(HeadingLevel::H1, "Title"),
            Block::paragraph("Intro"),
            Block::list(ListKind::Unordered, ["one", "two", "three"]),
            Block::quote("Quote"),
        ])
    }

    fn kinds(doc: &Document) -> Vec<LeafKind> {
        doc.leaves().iter().map(|leaf| leaf.kind).collect()
    }

    #[test]
    fn test_empty_document_has_one_paragraph() {
        let doc = Document::new();
        assert_eq!(doc.leaf_count(), 1);
        assert_eq!(doc.leaf(0).unwrap().kind, LeafKind::Paragraph);
        assert_eq!(Document::from_blocks(vec![]), doc);
    }

    #[test]
    fn test_leaves_are_numbered_in_document_order() {
        let doc = sample();
        assert_eq!(doc.leaf_count(), 6);
        assert_eq!(
            kinds(&doc),
            vec![
                LeafKind::Heading(HeadingLevel::H1),
                LeafKind::Paragraph,
                LeafKind::ListItem(ListKind::Unordered),
                LeafKind::ListItem(ListKind::Unordered),
                LeafKind::ListItem(ListKind::Unordered),
                LeafKind::Quote,
            ]
        );
        let leaf = doc.leaf(3).unwrap();
        assert_eq!(
            leaf.path,
            LeafPath {
                block: 2,
                item: Some(1)
            }
        );
        assert_eq!(leaf.content.text(), "two");
        assert_eq!(doc.plain_text(), "Title\nIntro\none\ntwo\nthree\nQuote");
    }

    #[test]
    fn test_leaf_mut_reaches_list_items() {
        let mut doc = sample();
        doc.leaf_mut(4).unwrap().append(TextBlock::from_text("!"));
        assert_eq!(doc.leaf(4).unwrap().content.text(), "three!");
        assert!(doc.leaf_mut(6).is_none());
    }

    #[test]
    fn test_set_block_keeps_inline_content() {
        let mut doc = Document::from_blocks(vec![Block::Paragraph(TextBlock::from_runs(vec![
            TextRun::new("Big").with_format(TextFormat::Bold),
        ]))]);
        let converted = doc.set_block(&(0..=0), BlockTarget::Heading(HeadingLevel::H2));
        assert_eq!(converted, 1);
        let Block::Heading { level, content } = &doc.blocks()[0] else {
            panic!("expected heading, got {:?}", doc.blocks()[0]);
        };
        assert_eq!(*level, HeadingLevel::H2);
        assert!(content.spans()[0].run.format.contains(TextFormat::Bold));
    }

    #[test]
    fn test_set_block_skips_list_items() {
        let mut doc = sample();
        let converted = doc.set_block(&(2..=3), BlockTarget::Quote);
        assert_eq!(converted, 0);
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_insert_list_only_touches_selected_blocks() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("a"),
            Block::paragraph("b"),
            Block::heading(HeadingLevel::H3, "c"),
            Block::paragraph("d"),
        ]);
        doc.insert_list(&(1..=2), ListKind::Ordered);
        assert_eq!(
            doc.blocks(),
            &[
                Block::paragraph("a"),
                Block::list(ListKind::Ordered, ["b", "c"]),
                Block::paragraph("d"),
            ]
        );
        assert_eq!(doc.leaf_count(), 4);
    }

    #[test]
    fn test_insert_list_merges_with_adjacent_list_of_same_kind() {
        let mut doc = sample();
        doc.insert_list(&(1..=1), ListKind::Unordered);
        assert_eq!(
            doc.blocks()[1],
            Block::list(ListKind::Unordered, ["Intro", "one", "two", "three"])
        );
    }

    #[test]
    fn test_remove_list_splits_list_around_selection() {
        let mut doc = sample();
        let removed = doc.remove_list(&(3..=3));
        assert_eq!(removed, 1);
        assert_eq!(
            &doc.blocks()[2..5],
            &[
                Block::list(ListKind::Unordered, ["one"]),
                Block::paragraph("two"),
                Block::list(ListKind::Unordered, ["three"]),
            ]
        );
    }

    #[test]
    fn test_remove_list_whole_list_leaves_no_wrapper() {
        let mut doc = sample();
        doc.remove_list(&(2..=4));
        assert!(
            !doc.blocks()
                .iter()
                .any(|block| matches!(block, Block::List { .. }))
        );
        assert_eq!(doc.leaf_count(), 6);
    }

    #[test]
    fn test_split_heading_at_end_creates_paragraph() {
        let mut doc = sample();
        let caret = doc.split_leaf(0, 5).unwrap();
        assert_eq!(caret, 1);
        assert_eq!(doc.leaf(1).unwrap().kind, LeafKind::Paragraph);
        assert_eq!(doc.leaf(1).unwrap().content.text(), "");
    }

    #[test]
    fn test_split_list_item_adds_item() {
        let mut doc = sample();
        doc.split_leaf(2, 1).unwrap();
        assert_eq!(
            doc.blocks()[2],
            Block::list(ListKind::Unordered, ["o", "ne", "two", "three"])
        );
    }

    #[test]
    fn test_split_empty_list_item_leaves_list() {
        let mut doc = Document::from_blocks(vec![Block::List {
            kind: ListKind::Ordered,
            items: vec![TextBlock::from_text("first"), TextBlock::new()],
        }]);
        let caret = doc.split_leaf(1, 0).unwrap();
        assert_eq!(caret, 1);
        assert_eq!(
            doc.blocks(),
            &[
                Block::list(ListKind::Ordered, ["first"]),
                Block::Paragraph(TextBlock::new()),
            ]
        );
    }

    #[test]
    fn test_insert_embed_splits_paragraph() {
        let mut doc = Document::from_blocks(vec![Block::paragraph("before after")]);
        let caret = doc
            .insert_embed(0, 7, Embed::youtube("dQw4w9WgXcQ"))
            .unwrap();
        assert_eq!(caret, 1);
        assert_eq!(
            doc.blocks(),
            &[
                Block::paragraph("before "),
                Block::Embed(Embed::youtube("dQw4w9WgXcQ")),
                Block::paragraph("after"),
            ]
        );
    }

    #[test]
    fn test_insert_embed_at_end_keeps_trailing_paragraph() {
        let mut doc = Document::from_blocks(vec![Block::heading(HeadingLevel::H2, "Trailer")]);
        let caret = doc.insert_embed(0, 7, Embed::youtube("abcdefghijk")).unwrap();
        assert_eq!(caret, 1);
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.leaf(1).unwrap().kind, LeafKind::Paragraph);
    }

    #[test]
    fn test_insert_embed_in_list_splits_list() {
        let mut doc = sample();
        let caret = doc.insert_embed(3, 3, Embed::youtube("abcdefghijk")).unwrap();
        assert_eq!(caret, 4);
        assert_eq!(
            &doc.blocks()[2..5],
            &[
                Block::list(ListKind::Unordered, ["one", "two"]),
                Block::Embed(Embed::youtube("abcdefghijk")),
                Block::list(ListKind::Unordered, ["", "three"]),
            ]
        );
    }

    #[test]
    fn test_remove_leaves_drops_embeds_inside_range() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("a"),
            Block::Embed(Embed::youtube("abcdefghijk")),
            Block::paragraph("b"),
            Block::paragraph("c"),
        ]);
        doc.remove_leaves(&(1..=1));
        assert_eq!(
            doc.blocks(),
            &[Block::paragraph("a"), Block::paragraph("c")]
        );
    }

    #[test]
    fn test_remove_embed_before_leaf() {
        let mut doc = Document::from_blocks(vec![
            Block::paragraph("a"),
            Block::Embed(Embed::youtube("abcdefghijk")),
            Block::paragraph("b"),
        ]);
        assert!(!doc.remove_embed_before(0));
        assert!(doc.remove_embed_before(1));
        assert_eq!(
            doc.blocks(),
            &[Block::paragraph("a"), Block::paragraph("b")]
        );
    }

    #[test]
    fn test_normalize_appends_paragraph_after_trailing_embed() {
        let doc = Document::from_blocks(vec![Block::Embed(Embed::youtube("abcdefghijk"))]);
        assert_eq!(doc.leaf_count(), 1);
        assert!(matches!(doc.blocks()[1], Block::Paragraph(_)));
    }
}
