//! HTML rendering of a [`Document`].
//!
//! The markup mirrors the block structure one to one:
//!
//! | node | markup |
//! |------|--------|
//! | paragraph | `<p>` (`<br>` when empty) |
//! | heading | `<h1>`..`<h6>` |
//! | quote | `<blockquote>` |
//! | list | `<ul>`/`<ol>` with one `<li>` per item |
//! | embed | YouTube `<iframe>` |
//! | link | `<a href target rel>` |
//! | run | `<code>`, `<strong>`, `<em>`, `<s>`, `<u>` outermost first, then `<span style>` |

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::editing::{
    Alignment, Block, Document, Embed, EmbedPlatform, Inline, LinkAttrs, TextBlock, TextFormat,
    TextRun,
};

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Tags for run formats, outermost first
const FORMAT_TAGS: [(TextFormat, &str); 5] = [
    (TextFormat::Code, "code"),
    (TextFormat::Bold, "strong"),
    (TextFormat::Italic, "em"),
    (TextFormat::Strikethrough, "s"),
    (TextFormat::Underline, "u"),
];

/// CSS classes put on format tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTheme {
    pub bold: Option<String>,
    pub italic: Option<String>,
    pub underline: Option<String>,
    pub strikethrough: Option<String>,
    pub code: Option<String>,
}

impl HtmlTheme {
    /// Utility classes used by the catalog site
    pub fn catalog() -> Self {
        Self {
            bold: Some("font-bold".to_string()),
            italic: Some("italic".to_string()),
            underline: Some("underline".to_string()),
            strikethrough: None,
            code: None,
        }
    }

    pub fn class_for(&self, format: TextFormat) -> Option<&str> {
        match format {
            TextFormat::Bold => self.bold.as_deref(),
            TextFormat::Italic => self.italic.as_deref(),
            TextFormat::Underline => self.underline.as_deref(),
            TextFormat::Strikethrough => self.strikethrough.as_deref(),
            TextFormat::Code => self.code.as_deref(),
        }
        .filter(|class| !class.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer {
    theme: HtmlTheme,
}

impl HtmlSerializer {
    pub fn new(theme: HtmlTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &HtmlTheme {
        &self.theme
    }

    pub fn serialize(&self, document: &Document) -> String {
        let mut out = String::new();
        for block in document.blocks() {
            self.write_block(&mut out, block);
        }
        out
    }

    fn write_block(&self, out: &mut String, block: &Block) {
        match block {
            Block::Paragraph(content) => self.write_text_block(out, "p", content),
            Block::Heading { level, content } => self.write_text_block(out, level.tag(), content),
            Block::Quote(content) => self.write_text_block(out, "blockquote", content),
            Block::List { kind, items } => {
                out.push_str(&format!("<{}>", kind.tag()));
                for item in items {
                    self.write_text_block(out, "li", item);
                }
                out.push_str(&format!("</{}>", kind.tag()));
            }
            Block::Embed(embed) => write_embed(out, embed),
        }
    }

    fn write_text_block(&self, out: &mut String, tag: &str, content: &TextBlock) {
        out.push('<');
        out.push_str(tag);
        if content.align != Alignment::Left {
            out.push_str(&format!(
                " style=\"text-align: {};\"",
                content.align.as_css()
            ));
        }
        out.push('>');

        if content.is_empty() {
            out.push_str("<br>");
        }
        for inline in &content.inlines {
            match inline {
                Inline::Text(run) => self.write_run(out, run),
                Inline::Link { attrs, runs } => {
                    write_link_open(out, attrs);
                    for run in runs {
                        self.write_run(out, run);
                    }
                    out.push_str("</a>");
                }
            }
        }

        out.push_str(&format!("</{tag}>"));
    }

    fn write_run(&self, out: &mut String, run: &TextRun) {
        let tags: Vec<(TextFormat, &str)> = FORMAT_TAGS
            .into_iter()
            .filter(|(format, _)| run.format.contains(*format))
            .collect();

        for (format, tag) in &tags {
            match self.theme.class_for(*format) {
                Some(class) => out.push_str(&format!(
                    "<{tag} class=\"{}\">",
                    encode_double_quoted_attribute(class)
                )),
                None => out.push_str(&format!("<{tag}>")),
            }
        }

        match run.style.to_css() {
            Some(css) => {
                out.push_str(&format!(
                    "<span style=\"{}\">",
                    encode_double_quoted_attribute(&css)
                ));
                out.push_str(&encode_text(&run.text));
                out.push_str("</span>");
            }
            None => out.push_str(&encode_text(&run.text)),
        }

        for (_, tag) in tags.iter().rev() {
            out.push_str(&format!("</{tag}>"));
        }
    }
}

fn write_link_open(out: &mut String, attrs: &LinkAttrs) {
    out.push_str(&format!(
        "<a href=\"{}\" target=\"{}\" rel=\"{}\">",
        encode_double_quoted_attribute(&attrs.url),
        attrs.target.as_attr(),
        attrs.rel.as_attr()
    ));
}

fn write_embed(out: &mut String, embed: &Embed) {
    match embed.platform {
        EmbedPlatform::YouTube => out.push_str(&format!(
            "<iframe width=\"560\" height=\"315\" src=\"{YOUTUBE_EMBED_BASE}{}\" \
             frameborder=\"0\" allow=\"accelerometer; autoplay; clipboard-write; \
             encrypted-media; gyroscope; picture-in-picture\" allowfullscreen=\"true\" \
             title=\"YouTube video\"></iframe>",
            encode_double_quoted_attribute(&embed.video_id)
        )),
    }
}

/// Render `document` without theme classes
pub fn to_html(document: &Document) -> String {
    HtmlSerializer::default().serialize(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{
        HeadingLevel, LinkRel, ListKind, StyleProperty, TextBlock, TextFormat, TextRun,
    };
    use pretty_assertions::assert_eq;

    fn doc(blocks: Vec<Block>) -> Document {
        Document::from_blocks(blocks)
    }

    #[test]
    fn test_empty_document_renders_empty_paragraph() {
        assert_eq!(to_html(&Document::new()), "<p><br></p>");
    }

    #[test]
    fn test_blocks_map_to_tags() {
        let html = to_html(&doc(vec![
            Block::heading(HeadingLevel::H2, "Story"),
            Block::quote("Epic"),
            Block::list(ListKind::Ordered, ["one", "two"]),
        ]));
        assert_eq!(
            html,
            "<h2>Story</h2><blockquote>Epic</blockquote><ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_format_tags_nest_in_fixed_order() {
        let run = TextRun::new("x")
            .with_format(TextFormat::Underline)
            .with_format(TextFormat::Bold)
            .with_format(TextFormat::Code);
        let html = to_html(&doc(vec![Block::Paragraph(TextBlock::from_runs(vec![run]))]));
        assert_eq!(html, "<p><code><strong><u>x</u></strong></code></p>");
    }

    #[test]
    fn test_theme_classes_are_applied() {
        let run = TextRun::new("bold")
            .with_format(TextFormat::Bold)
            .with_format(TextFormat::Strikethrough);
        let html = HtmlSerializer::new(HtmlTheme::catalog())
            .serialize(&doc(vec![Block::Paragraph(TextBlock::from_runs(vec![run]))]));
        assert_eq!(html, "<p><strong class=\"font-bold\"><s>bold</s></strong></p>");
    }

    #[test]
    fn test_style_overrides_render_span() {
        let run = TextRun::new("big").with_style(StyleProperty::FontSize, "24px");
        let html = to_html(&doc(vec![Block::Paragraph(TextBlock::from_runs(vec![run]))]));
        assert_eq!(html, "<p><span style=\"font-size: 24px;\">big</span></p>");
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let mut block = TextBlock::from_text("<b>&</b>");
        block.map_range(0..3, |span| {
            span.link = Some(LinkAttrs::new_tab("https://a.io/?q=\"x\"", LinkRel::Default))
        });
        let html = to_html(&doc(vec![Block::Paragraph(block)]));
        assert_eq!(
            html,
            "<p><a href=\"https://a.io/?q=&quot;x&quot;\" target=\"_blank\" rel=\"noopener noreferrer\">&lt;b&gt;</a>&amp;&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn test_alignment_and_embed() {
        let mut centered = TextBlock::from_text("mid");
        centered.align = Alignment::Center;
        let html = to_html(&doc(vec![
            Block::Paragraph(centered),
            Block::Embed(Embed::youtube("dQw4w9WgXcQ")),
        ]));
        assert!(html.starts_with("<p style=\"text-align: center;\">mid</p><iframe "));
        assert!(html.contains("src=\"https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ\""));
        assert!(html.ends_with("</iframe><p><br></p>"));
    }
}
