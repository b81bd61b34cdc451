//! Node types of the rich-text document.
//!
//! The document is a closed set of tagged variants: blocks (paragraph,
//! heading, quote, list, embed) and inline content (text runs and links).
//! Everything that needs per-kind behavior matches on these enums.

use std::ops::Range;

use serde::{Serialize, Serializer};

/// Inline format flags a text run can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl TextFormat {
    pub const ALL: [TextFormat; 5] = [
        TextFormat::Bold,
        TextFormat::Italic,
        TextFormat::Underline,
        TextFormat::Strikethrough,
        TextFormat::Code,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextFormat::Bold => "bold",
            TextFormat::Italic => "italic",
            TextFormat::Underline => "underline",
            TextFormat::Strikethrough => "strikethrough",
            TextFormat::Code => "code",
        }
    }
}

/// Set of [`TextFormat`] flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormatFlags(u8);

impl FormatFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, format: TextFormat) -> bool {
        self.0 & format.bit() != 0
    }

    pub fn insert(&mut self, format: TextFormat) {
        self.0 |= format.bit();
    }

    pub fn remove(&mut self, format: TextFormat) {
        self.0 &= !format.bit();
    }

    pub fn toggle(&mut self, format: TextFormat) {
        self.0 ^= format.bit();
    }

    pub fn set(&mut self, format: TextFormat, on: bool) {
        if on {
            self.insert(format);
        } else {
            self.remove(format);
        }
    }

    pub fn with(mut self, format: TextFormat) -> Self {
        self.insert(format);
        self
    }

    pub fn intersection(self, other: FormatFlags) -> FormatFlags {
        FormatFlags(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TextFormat> {
        TextFormat::ALL
            .into_iter()
            .filter(move |format| self.contains(*format))
    }
}

impl FromIterator<TextFormat> for FormatFlags {
    fn from_iter<I: IntoIterator<Item = TextFormat>>(iter: I) -> Self {
        let mut flags = FormatFlags::empty();
        for format in iter {
            flags.insert(format);
        }
        flags
    }
}

impl Serialize for FormatFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Run-level style property that can be overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    FontFamily,
    FontSize,
}

impl StyleProperty {
    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::FontFamily => "font-family",
            StyleProperty::FontSize => "font-size",
        }
    }
}

/// Style overrides carried by a text run
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StyleOverrides {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
}

impl StyleOverrides {
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        match property {
            StyleProperty::FontFamily => self.font_family.as_deref(),
            StyleProperty::FontSize => self.font_size.as_deref(),
        }
    }

    /// Set a property; an empty value clears the override
    pub fn set(&mut self, property: StyleProperty, value: &str) {
        let value = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        match property {
            StyleProperty::FontFamily => self.font_family = value,
            StyleProperty::FontSize => self.font_size = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.font_family.is_none() && self.font_size.is_none()
    }

    /// Inline CSS declaration list, e.g. `font-family: Georgia; font-size: 20px;`
    pub fn to_css(&self) -> Option<String> {
        let declarations: Vec<String> = [StyleProperty::FontFamily, StyleProperty::FontSize]
            .into_iter()
            .filter_map(|property| {
                self.get(property)
                    .map(|value| format!("{}: {};", property.css_name(), value))
            })
            .collect();

        if declarations.is_empty() {
            None
        } else {
            Some(declarations.join(" "))
        }
    }
}

/// A span of text with uniform formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub format: FormatFlags,
    pub style: StyleOverrides,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format.insert(format);
        self
    }

    pub fn with_style(mut self, property: StyleProperty, value: &str) -> Self {
        self.style.set(property, value);
        self
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn same_marks(&self, other: &TextRun) -> bool {
        self.format == other.format && self.style == other.style
    }
}

/// Where a link opens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    #[default]
    NewTab,
    SameTab,
}

impl LinkTarget {
    pub fn as_attr(self) -> &'static str {
        match self {
            LinkTarget::NewTab => "_blank",
            LinkTarget::SameTab => "_self",
        }
    }
}

/// Relation attribute policy of a link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRel {
    #[default]
    Default,
    NoFollow,
}

impl LinkRel {
    pub fn as_attr(self) -> &'static str {
        match self {
            LinkRel::Default => "noopener noreferrer",
            LinkRel::NoFollow => "nofollow noopener",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
    pub url: String,
    pub target: LinkTarget,
    pub rel: LinkRel,
}

impl LinkAttrs {
    /// Link opening in a new tab
    pub fn new_tab(url: impl Into<String>, rel: LinkRel) -> Self {
        Self {
            url: url.into(),
            target: LinkTarget::NewTab,
            rel,
        }
    }
}

/// Inline content of a text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(TextRun),
    Link { attrs: LinkAttrs, runs: Vec<TextRun> },
}

/// A text run together with the link that wraps it, if any.
///
/// Editing operations work on the flat span list of a block and regroup the
/// result into [`Inline`] nodes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub run: TextRun,
    pub link: Option<LinkAttrs>,
}

impl Span {
    pub fn char_len(&self) -> usize {
        self.run.char_len()
    }
}

/// Horizontal alignment of a text block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Inline content plus block-level alignment.
///
/// Paragraphs, headings, quotes and list items all hold one of these; they are
/// the "text leaves" a selection can point into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub inlines: Vec<Inline>,
    pub align: Alignment,
}

impl TextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_runs(vec![TextRun::new(text)])
    }

    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self::from_spans(
            runs.into_iter().map(|run| Span { run, link: None }).collect(),
            Alignment::Left,
        )
    }

    pub fn from_spans(spans: Vec<Span>, align: Alignment) -> Self {
        let mut block = Self {
            inlines: Vec::new(),
            align,
        };
        block.set_spans(spans);
        block
    }

    pub fn text(&self) -> String {
        self.spans().iter().map(|span| span.run.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.spans().iter().map(Span::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// Flatten inline nodes into spans, in order
    pub fn spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(run) => spans.push(Span {
                    run: run.clone(),
                    link: None,
                }),
                Inline::Link { attrs, runs } => {
                    spans.extend(runs.iter().map(|run| Span {
                        run: run.clone(),
                        link: Some(attrs.clone()),
                    }));
                }
            }
        }
        spans
    }

    /// Replace the content with `spans`, merging and regrouping them
    pub fn set_spans(&mut self, spans: Vec<Span>) {
        self.inlines = group(merge(spans));
    }

    /// Span holding the character a caret at `offset` is attached to: the
    /// character before the caret, or the first character at offset 0.
    pub fn span_at_caret(&self, offset: usize) -> Option<Span> {
        let lookup = offset.saturating_sub(1);
        let mut pos = 0;
        for span in self.spans() {
            let len = span.char_len();
            if lookup < pos + len {
                return Some(span);
            }
            pos += len;
        }
        None
    }

    /// Spans covering exactly `range`, split at its boundaries
    pub fn spans_in(&self, range: Range<usize>) -> Vec<Span> {
        let mut spans = self.spans();
        let start = split_at(&mut spans, range.start);
        let end = split_at(&mut spans, range.end);
        spans.drain(start..end).collect()
    }

    /// Apply `f` to every span inside `range`
    pub(crate) fn map_range(&mut self, range: Range<usize>, mut f: impl FnMut(&mut Span)) {
        let mut spans = self.spans();
        let start = split_at(&mut spans, range.start);
        let end = split_at(&mut spans, range.end);
        for span in &mut spans[start..end] {
            f(span);
        }
        self.set_spans(spans);
    }

    pub(crate) fn insert(&mut self, offset: usize, span: Span) {
        let mut spans = self.spans();
        let at = split_at(&mut spans, offset);
        spans.insert(at, span);
        self.set_spans(spans);
    }

    pub(crate) fn delete(&mut self, range: Range<usize>) {
        let mut spans = self.spans();
        let start = split_at(&mut spans, range.start);
        let end = split_at(&mut spans, range.end);
        spans.drain(start..end);
        self.set_spans(spans);
    }

    /// Split at `offset`, keeping the head and returning the tail
    pub(crate) fn split_off(&mut self, offset: usize) -> TextBlock {
        let mut spans = self.spans();
        let at = split_at(&mut spans, offset);
        let tail = spans.split_off(at);
        self.set_spans(spans);
        TextBlock::from_spans(tail, self.align)
    }

    pub(crate) fn append(&mut self, other: TextBlock) {
        let mut spans = self.spans();
        spans.extend(other.spans());
        self.set_spans(spans);
    }

    /// Link wrapping both neighbours of `offset`; text typed there joins it
    pub(crate) fn link_around(&self, offset: usize) -> Option<LinkAttrs> {
        if offset == 0 {
            return None;
        }
        let before = self.span_at_caret(offset)?.link?;
        let after = self.span_at_caret(offset + 1)?.link?;
        (before == after).then_some(before)
    }

    /// Unwrap every link touched by `range`. An empty range unwraps the link
    /// holding the caret character.
    pub(crate) fn unlink(&mut self, range: Range<usize>) -> bool {
        let mut spans = self.spans();
        let mut changed = false;
        let mut pos = 0;
        let mut i = 0;

        while i < spans.len() {
            let Some(attrs) = spans[i].link.clone() else {
                pos += spans[i].char_len();
                i += 1;
                continue;
            };

            let (group_start, first) = (pos, i);
            while i < spans.len() && spans[i].link.as_ref() == Some(&attrs) {
                pos += spans[i].char_len();
                i += 1;
            }

            let hit = if range.is_empty() {
                let lookup = range.start.saturating_sub(1);
                group_start <= lookup && lookup < pos
            } else {
                group_start < range.end && range.start < pos
            };

            if hit {
                for span in &mut spans[first..i] {
                    span.link = None;
                }
                changed = true;
            }
        }

        self.set_spans(spans);
        changed
    }
}

/// Ensure a span boundary at char offset `at`; returns the index of the first
/// span starting at or after it.
fn split_at(spans: &mut Vec<Span>, at: usize) -> usize {
    let mut pos = 0;
    for i in 0..spans.len() {
        if pos >= at {
            return i;
        }
        let len = spans[i].char_len();
        if at < pos + len {
            let byte = byte_index(&spans[i].run.text, at - pos);
            let tail_text = spans[i].run.text.split_off(byte);
            let mut tail = spans[i].clone();
            tail.run.text = tail_text;
            spans.insert(i + 1, tail);
            return i + 1;
        }
        pos += len;
    }
    spans.len()
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Drop empty runs and merge neighbours with identical marks and link
fn merge(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.run.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.link == span.link && last.run.same_marks(&span.run) => {
                last.run.text.push_str(&span.run.text);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Regroup consecutive spans sharing a link into one link node
fn group(spans: Vec<Span>) -> Vec<Inline> {
    let mut inlines: Vec<Inline> = Vec::new();
    for Span { run, link } in spans {
        match link {
            None => inlines.push(Inline::Text(run)),
            Some(attrs) => match inlines.last_mut() {
                Some(Inline::Link {
                    attrs: current,
                    runs,
                }) if *current == attrs => runs.push(run),
                _ => inlines.push(Inline::Link {
                    attrs,
                    runs: vec![run],
                }),
            },
        }
    }
    inlines
}

/// Heading levels h1..h6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub fn level(self) -> u8 {
        self as u8 + 1
    }

    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = crate::EditorError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            4 => Ok(HeadingLevel::H4),
            5 => Ok(HeadingLevel::H5),
            6 => Ok(HeadingLevel::H6),
            _ => Err(crate::EditorError::InvalidHeadingLevel(level)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedPlatform {
    YouTube,
}

/// External media addressed by a platform identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub platform: EmbedPlatform,
    pub video_id: String,
}

impl Embed {
    pub fn youtube(video_id: impl Into<String>) -> Self {
        Self {
            platform: EmbedPlatform::YouTube,
            video_id: video_id.into(),
        }
    }
}

/// Top-level structural unit of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Paragraph(TextBlock),
    Heading {
        level: HeadingLevel,
        content: TextBlock,
    },
    Quote(TextBlock),
    List {
        kind: ListKind,
        items: Vec<TextBlock>,
    },
    Embed(Embed),
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(TextBlock::from_text(text))
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            content: TextBlock::from_text(text),
        }
    }

    pub fn quote(text: impl Into<String>) -> Self {
        Block::Quote(TextBlock::from_text(text))
    }

    pub fn list<I, S>(kind: ListKind, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::List {
            kind,
            items: items.into_iter().map(TextBlock::from_text).collect(),
        }
    }

    /// Number of text leaves this block contributes
    pub fn leaf_count(&self) -> usize {
        match self {
            Block::Paragraph(_) | Block::Heading { .. } | Block::Quote(_) => 1,
            Block::List { items, .. } => items.len(),
            Block::Embed(_) => 0,
        }
    }

    /// Content of a paragraph, heading or quote
    pub fn text_content(&self) -> Option<&TextBlock> {
        match self {
            Block::Paragraph(content)
            | Block::Heading { content, .. }
            | Block::Quote(content) => Some(content),
            Block::List { .. } | Block::Embed(_) => None,
        }
    }

    pub(crate) fn into_text_content(self) -> Option<TextBlock> {
        match self {
            Block::Paragraph(content)
            | Block::Heading { content, .. }
            | Block::Quote(content) => Some(content),
            Block::List { .. } | Block::Embed(_) => None,
        }
    }

    /// Same block kind holding different content
    pub(crate) fn with_content(&self, content: TextBlock) -> Block {
        match self {
            Block::Heading { level, .. } => Block::Heading {
                level: *level,
                content,
            },
            Block::Quote(_) => Block::Quote(content),
            _ => Block::Paragraph(content),
        }
    }
}

/// Block constructors accepted by the set-block command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTarget {
    Paragraph,
    Heading(HeadingLevel),
    Quote,
}

impl BlockTarget {
    pub(crate) fn build(self, content: TextBlock) -> Block {
        match self {
            BlockTarget::Paragraph => Block::Paragraph(content),
            BlockTarget::Heading(level) => Block::Heading { level, content },
            BlockTarget::Quote => Block::Quote(content),
        }
    }
}
