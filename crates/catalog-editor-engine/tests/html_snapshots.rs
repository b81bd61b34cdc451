use catalog_editor_engine::{
    Alignment, Block, Document, EditorState, Embed, HeadingLevel, HtmlSerializer, HtmlTheme,
    LinkAttrs, LinkRel, ListKind, Selection, Span, StyleProperty, TextBlock, TextFormat, TextRun,
    classify, to_html,
};

fn game_page() -> Document {
    let plain = |run: TextRun| Span { run, link: None };
    let intro = TextBlock::from_spans(
        vec![
            plain(TextRun::new("A ")),
            Span {
                run: TextRun::new("cozy")
                    .with_format(TextFormat::Bold)
                    .with_format(TextFormat::Italic),
                link: Some(LinkAttrs::new_tab(
                    "https://innliv.com/cozy",
                    LinkRel::NoFollow,
                )),
            },
            plain(TextRun::new(" farming game.").with_style(StyleProperty::FontSize, "20px")),
        ],
        Alignment::Left,
    );

    let mut centered = TextBlock::from_text("Coming soon");
    centered.align = Alignment::Center;

    Document::from_blocks(vec![
        Block::heading(HeadingLevel::H1, "Harvest Moonrise"),
        Block::Paragraph(intro),
        Block::list(ListKind::Unordered, ["Crops", "Animals"]),
        Block::Embed(Embed::youtube("dQw4w9WgXcQ")),
        Block::Paragraph(centered),
    ])
}

#[test]
fn snapshot_game_page_html() {
    insta::assert_snapshot!(
        HtmlSerializer::new(HtmlTheme::catalog()).serialize(&game_page()),
        @r#"<h1>Harvest Moonrise</h1><p>A <a href="https://innliv.com/cozy" target="_blank" rel="nofollow noopener"><strong class="font-bold"><em class="italic">cozy</em></strong></a><span style="font-size: 20px;"> farming game.</span></p><ul><li>Crops</li><li>Animals</li></ul><iframe width="560" height="315" src="https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen="true" title="YouTube video"></iframe><p style="text-align: center;">Coming soon</p>"#
    );
}

#[test]
fn snapshot_markdown_import_html() {
    let doc = Document::from_markdown("## Features\n\n- **Co-op** play\n- Mod support\n\n> Best game of the year\n");
    insta::assert_snapshot!(
        to_html(&doc),
        @"<h2>Features</h2><ul><li><strong>Co-op</strong> play</li><li>Mod support</li></ul><blockquote>Best game of the year</blockquote>"
    );
}

#[test]
fn snapshot_toolbar_state_for_caret_in_list() {
    let mut state = EditorState::new(game_page());
    state.selection = Selection::caret(2, 3);
    insta::assert_yaml_snapshot!(classify(&state), @r"
    active_formats: []
    block_type:
      list: unordered
    is_link: false
    font_size: ~
    font_family: ~
    alignment: left
    can_undo: false
    can_redo: false
    ");
}
