//! CommonMark import.
//!
//! Maps what the rich-text model can hold (paragraphs, headings, quotes,
//! lists, emphasis, strong, strikethrough, inline code and links) and keeps
//! only the text of everything else. Nested lists are flattened into their
//! outermost list; paragraphs inside block quotes become quotes.

use pulldown_cmark::{Event, HeadingLevel as MdHeadingLevel, Options, Parser, Tag, TagEnd};

use crate::editing::{
    Alignment, Block, Document, FormatFlags, HeadingLevel, LinkAttrs, LinkRel, ListKind, Span,
    TextBlock, TextFormat, TextRun,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafTarget {
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    ListItem,
}

struct OpenLeaf {
    target: LeafTarget,
    spans: Vec<Span>,
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    leaf: Option<OpenLeaf>,
    formats: Vec<TextFormat>,
    link: Option<LinkAttrs>,
    quote_depth: usize,
    /// Outermost open list and the items collected so far
    list: Option<(ListKind, Vec<TextBlock>)>,
    list_depth: usize,
    in_code_block: bool,
}

impl Builder {
    fn open(&mut self, target: LeafTarget) {
        self.close();
        self.leaf = Some(OpenLeaf {
            target,
            spans: Vec::new(),
        });
    }

    fn close(&mut self) {
        let Some(leaf) = self.leaf.take() else {
            return;
        };
        let content = TextBlock::from_spans(leaf.spans, Alignment::Left);
        match leaf.target {
            LeafTarget::ListItem => {
                if let Some((_, items)) = self.list.as_mut() {
                    items.push(content);
                }
            }
            LeafTarget::Paragraph => self.blocks.push(Block::Paragraph(content)),
            LeafTarget::Heading(level) => self.blocks.push(Block::Heading { level, content }),
            LeafTarget::Quote => self.blocks.push(Block::Quote(content)),
        }
    }

    fn text_target(&self) -> LeafTarget {
        if self.list_depth > 0 {
            LeafTarget::ListItem
        } else if self.quote_depth > 0 {
            LeafTarget::Quote
        } else {
            LeafTarget::Paragraph
        }
    }

    fn push_text(&mut self, text: &str, extra: Option<TextFormat>) {
        if text.is_empty() {
            return;
        }
        if self.leaf.is_none() {
            self.open(self.text_target());
        }
        let mut format: FormatFlags = self.formats.iter().copied().collect();
        if let Some(extra) = extra {
            format.insert(extra);
        }
        let span = Span {
            run: TextRun {
                text: text.to_string(),
                format,
                style: Default::default(),
            },
            link: self.link.clone(),
        };
        if let Some(leaf) = self.leaf.as_mut() {
            leaf.spans.push(span);
        }
    }

    fn push_code_block(&mut self, text: &str) {
        for line in text.lines() {
            self.open(self.text_target());
            self.push_text(line, Some(TextFormat::Code));
            self.close();
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // Loose list items wrap their text in paragraphs
                match self.leaf.as_ref() {
                    Some(leaf) if leaf.target == LeafTarget::ListItem => {
                        if !leaf.spans.is_empty() {
                            self.push_text(" ", None);
                        }
                    }
                    _ => self.open(self.text_target()),
                }
            }
            Tag::Heading { level, .. } => self.open(LeafTarget::Heading(heading_level(level))),
            Tag::BlockQuote(_) => {
                self.close();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.close();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.close();
                if self.list_depth == 0 {
                    let kind = if start.is_some() {
                        ListKind::Ordered
                    } else {
                        ListKind::Unordered
                    };
                    self.list = Some((kind, Vec::new()));
                }
                self.list_depth += 1;
            }
            Tag::Item => self.open(LeafTarget::ListItem),
            Tag::Emphasis => self.formats.push(TextFormat::Italic),
            Tag::Strong => self.formats.push(TextFormat::Bold),
            Tag::Strikethrough => self.formats.push(TextFormat::Strikethrough),
            Tag::Link { dest_url, .. } => {
                self.link = Some(LinkAttrs::new_tab(dest_url.to_string(), LinkRel::Default));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.text_target() != LeafTarget::ListItem {
                    self.close();
                }
            }
            TagEnd::Heading(_) | TagEnd::Item => self.close(),
            TagEnd::BlockQuote(_) => {
                self.close();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.in_code_block = false,
            TagEnd::List(_) => {
                self.close();
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    if let Some((kind, items)) = self.list.take() {
                        self.blocks.push(Block::List { kind, items });
                    }
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.formats.pop();
            }
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }

    fn finish(mut self) -> Document {
        self.close();
        Document::from_blocks(self.blocks)
    }
}

fn heading_level(level: MdHeadingLevel) -> HeadingLevel {
    match level {
        MdHeadingLevel::H1 => HeadingLevel::H1,
        MdHeadingLevel::H2 => HeadingLevel::H2,
        MdHeadingLevel::H3 => HeadingLevel::H3,
        MdHeadingLevel::H4 => HeadingLevel::H4,
        MdHeadingLevel::H5 => HeadingLevel::H5,
        MdHeadingLevel::H6 => HeadingLevel::H6,
    }
}

impl Document {
    /// Build a document from CommonMark source
    pub fn from_markdown(source: &str) -> Document {
        let mut builder = Builder::default();
        for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
            match event {
                Event::Start(tag) => builder.start(tag),
                Event::End(tag) => builder.end(tag),
                Event::Text(text) if builder.in_code_block => builder.push_code_block(&text),
                Event::Text(text) => builder.push_text(&text, None),
                Event::Code(text) => builder.push_text(&text, Some(TextFormat::Code)),
                Event::SoftBreak | Event::HardBreak => builder.push_text(" ", None),
                _ => {}
            }
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Inline;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headings_paragraphs_and_quotes() {
        let doc = Document::from_markdown("# Title\n\nIntro text\n\n> Quoted\n\nSetext\n------\n");
        assert_eq!(
            doc.blocks(),
            &[
                Block::heading(HeadingLevel::H1, "Title"),
                Block::paragraph("Intro text"),
                Block::quote("Quoted"),
                Block::heading(HeadingLevel::H2, "Setext"),
            ]
        );
    }

    #[test]
    fn test_lists_flatten_nested_items() {
        let doc = Document::from_markdown("- one\n- two\n  - nested\n- three\n\n1. first\n2. second\n");
        assert_eq!(
            doc.blocks(),
            &[
                Block::list(ListKind::Unordered, ["one", "two", "nested", "three"]),
                Block::list(ListKind::Ordered, ["first", "second"]),
            ]
        );
    }

    #[test]
    fn test_inline_formats_and_links() {
        let doc = Document::from_markdown("**bold** *it* ~~gone~~ `code` [site](https://innliv.com)");
        let content = doc.leaf(0).expect("Should have a leaf").content;
        let spans = content.spans();

        assert!(spans[0].run.format.contains(TextFormat::Bold));
        assert_eq!(spans[0].run.text, "bold");
        assert!(spans[2].run.format.contains(TextFormat::Italic));
        assert!(spans[4].run.format.contains(TextFormat::Strikethrough));
        assert!(spans[6].run.format.contains(TextFormat::Code));
        assert_eq!(
            content.inlines.last(),
            Some(&Inline::Link {
                attrs: LinkAttrs::new_tab("https://innliv.com", LinkRel::Default),
                runs: vec![TextRun::new("site")],
            })
        );
    }

    #[test]
    fn test_code_block_lines_become_code_paragraphs() {
        let doc = Document::from_markdown("```\nlet a = 1;\nlet b = 2;\n```\n");
        assert_eq!(doc.leaf_count(), 2);
        assert!(
            doc.leaf(1).unwrap().content.spans()[0]
                .run
                .format
                .contains(TextFormat::Code)
        );
    }

    #[test]
    fn test_empty_source_gives_empty_paragraph() {
        assert_eq!(Document::from_markdown(""), Document::new());
    }
}
