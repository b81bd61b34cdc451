use std::hint::black_box;

use catalog_editor_engine::{
    Cmd, Document, Editor, EditorState, HtmlSerializer, HtmlTheme, Point, Selection, TextFormat,
    classify,
};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_markdown_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown_import");
    group.sample_size(20);

    let content = common::generate_large_description();
    group.bench_function("from_markdown", |b| {
        b.iter(|| {
            let doc = Document::from_markdown(black_box(&content));
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    group.sample_size(20);

    let doc = Document::from_markdown(&common::generate_large_description());
    let serializer = HtmlSerializer::new(HtmlTheme::catalog());
    group.bench_function("html", |b| {
        b.iter(|| {
            let html = serializer.serialize(black_box(&doc));
            black_box(html);
        });
    });

    group.finish();
}

fn bench_inspect(c: &mut Criterion) {
    let mut group = c.benchmark_group("inspect");

    let document = Document::from_markdown(&common::generate_large_description());
    let last = document.leaf_count() - 1;
    let mut state = EditorState::new(document);
    state.selection = Selection::range(Point::new(0, 0), Point::new(last, 0));

    group.bench_function("classify_whole_document", |b| {
        b.iter(|| black_box(classify(black_box(&state))));
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    group.sample_size(20);

    let document = Document::from_markdown(&common::generate_description(20));
    group.bench_function("type_and_toggle_100", |b| {
        b.iter(|| {
            let mut editor = Editor::new(document.clone());
            for i in 0..100 {
                if i % 10 == 0 {
                    editor
                        .dispatch(Cmd::ToggleFormat(TextFormat::Bold))
                        .expect("toggle failed");
                }
                editor
                    .dispatch(Cmd::InsertText("x".to_string()))
                    .expect("insert failed");
            }
            black_box(editor.version());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_markdown_import,
    bench_serialize,
    bench_inspect,
    bench_typing
);
criterion_main!(benches);
