//! Document to terminal lines.

use std::ops::Range;

use catalog_editor_engine::{
    Alignment, Block, EditorState, EmbedPlatform, ListKind, Span as TextSpan, TextBlock,
    TextFormat,
};
use ratatui::{
    layout::Alignment as LineAlignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub struct DocumentView {
    pub lines: Vec<Line<'static>>,
    /// Caret column and row inside the view
    pub caret: Option<(u16, u16)>,
}

pub fn render_document(state: &EditorState, width: u16, placeholder: &str) -> DocumentView {
    let selection = &state.selection;
    let document = &state.document;
    let mut lines = Vec::new();
    let mut caret = None;
    let mut leaf = 0;

    if document.leaf_count() == 1 && document.plain_text().is_empty() && document.blocks().len() == 1 {
        lines.push(Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
        return DocumentView {
            lines,
            caret: Some((0, 0)),
        };
    }

    let mut push_leaf = |lines: &mut Vec<Line<'static>>, prefix: String, style: Style, content: &TextBlock| {
        let selected = (!selection.is_collapsed() && selection.leaves().contains(&leaf))
            .then(|| selection.range_in_leaf(leaf, content.char_len()));
        let line = leaf_line(prefix.clone(), style, content, selected);

        if selection.focus.leaf == leaf {
            let text_len = (prefix.chars().count() + content.char_len()) as u16;
            let indent = match content.align {
                Alignment::Center => width.saturating_sub(text_len) / 2,
                Alignment::Right => width.saturating_sub(text_len),
                Alignment::Left | Alignment::Justify => 0,
            };
            let column = indent + (prefix.chars().count() + selection.focus.offset) as u16;
            caret = Some((column, lines.len() as u16));
        }
        lines.push(line);
        leaf += 1;
    };

    for block in document.blocks() {
        match block {
            Block::Paragraph(content) => push_leaf(&mut lines, String::new(), Style::default(), content),
            Block::Heading { level, content } => push_leaf(
                &mut lines,
                format!("{} ", "#".repeat(level.level() as usize)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                content,
            ),
            Block::Quote(content) => push_leaf(
                &mut lines,
                "│ ".to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
                content,
            ),
            Block::List { kind, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = match kind {
                        ListKind::Unordered => "• ".to_string(),
                        ListKind::Ordered => format!("{}. ", i + 1),
                    };
                    push_leaf(&mut lines, marker, Style::default(), item);
                }
            }
            Block::Embed(embed) => {
                let platform = match embed.platform {
                    EmbedPlatform::YouTube => "YouTube",
                };
                lines.push(Line::from(Span::styled(
                    format!("[▶ {platform} {}]", embed.video_id),
                    Style::default().fg(Color::Magenta),
                )));
            }
        }
    }

    DocumentView { lines, caret }
}

fn leaf_line(
    prefix: String,
    style: Style,
    content: &TextBlock,
    selected: Option<Range<usize>>,
) -> Line<'static> {
    let mut spans = Vec::new();
    if !prefix.is_empty() {
        spans.push(Span::styled(prefix, Style::default().fg(Color::DarkGray)));
    }

    let mut pos = 0;
    for span in content.spans() {
        let span_style = style.patch(span_style(&span));
        let chars: Vec<char> = span.run.text.chars().collect();
        let end = pos + chars.len();

        // Cut the span where the selection starts and ends
        let mut cuts = vec![0, chars.len()];
        if let Some(range) = &selected {
            for at in [range.start, range.end] {
                if pos < at && at < end {
                    cuts.push(at - pos);
                }
            }
        }
        cuts.sort_unstable();
        cuts.dedup();

        for pair in cuts.windows(2) {
            let text: String = chars[pair[0]..pair[1]].iter().collect();
            let absolute = pos + pair[0];
            let highlighted = selected
                .as_ref()
                .is_some_and(|range| range.start <= absolute && absolute < range.end);
            let piece_style = if highlighted {
                span_style.add_modifier(Modifier::REVERSED)
            } else {
                span_style
            };
            spans.push(Span::styled(text, piece_style));
        }
        pos = end;
    }

    Line::from(spans).alignment(match content.align {
        Alignment::Left | Alignment::Justify => LineAlignment::Left,
        Alignment::Center => LineAlignment::Center,
        Alignment::Right => LineAlignment::Right,
    })
}

fn span_style(span: &TextSpan) -> Style {
    let mut style = Style::default();
    for format in span.run.format.iter() {
        style = match format {
            TextFormat::Bold => style.add_modifier(Modifier::BOLD),
            TextFormat::Italic => style.add_modifier(Modifier::ITALIC),
            TextFormat::Underline => style.add_modifier(Modifier::UNDERLINED),
            TextFormat::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
            TextFormat::Code => style.fg(Color::Yellow),
        };
    }
    if span.link.is_some() {
        style = style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    }
    style
}
