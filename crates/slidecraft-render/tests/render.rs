//! End-to-end rendering against a minimal template archive.

use pretty_assertions::assert_eq;
use slidecraft_protocol::SlideRecord;
use slidecraft_render::{DeckRenderer, RenderError};
use slidecraft_test_utils::{deck_shape_texts, write_minimal_template};
use tempfile::tempdir;

fn record(title: &str, bullets: &[&str]) -> SlideRecord {
    SlideRecord {
        title: Some(title.to_string()),
        content: Some(bullets.iter().map(|b| b.to_string()).collect()),
    }
}

#[test]
fn renders_title_slide_plus_one_slide_per_record() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.pptx");
    write_minimal_template(&template);

    let records = vec![
        record("Intro", &["Clean energy"]),
        record("Cost", &["Falling prices", "ROI in 5 years"]),
    ];
    let renderer = DeckRenderer::new(&template, 0, 1);
    let output = renderer
        .render("Solar Power", &records, &dir.path().join("out"))
        .expect("render");

    let slides = deck_shape_texts(&output);
    assert_eq!(slides.len(), 3);
    assert_eq!(
        slides[0],
        vec![
            "Solar Power".to_string(),
            "Generated by Slidecraft".to_string()
        ]
    );
    assert_eq!(
        slides[1],
        vec!["Intro".to_string(), "Clean energy".to_string()]
    );
    assert_eq!(
        slides[2],
        vec![
            "Cost".to_string(),
            "Falling prices\nROI in 5 years".to_string()
        ]
    );
}

#[test]
fn renders_empty_record_list_as_title_only_deck() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.pptx");
    write_minimal_template(&template);

    let renderer = DeckRenderer::new(&template, 0, 1);
    let output = renderer
        .render("Quarterly Review", &[], dir.path())
        .expect("render");

    let slides = deck_shape_texts(&output);
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0][0], "Quarterly Review");
}

#[test]
fn record_without_title_or_content_still_produces_a_slide() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.pptx");
    write_minimal_template(&template);

    let records = vec![SlideRecord {
        title: None,
        content: None,
    }];
    let renderer = DeckRenderer::new(&template, 0, 1);
    let output = renderer.render("Sparse", &records, dir.path()).expect("render");

    let slides = deck_shape_texts(&output);
    assert_eq!(slides.len(), 2);
    // No placeholders were requested, so the content slide carries no shapes.
    assert_eq!(slides[1], Vec::<String>::new());
}

#[test]
fn consecutive_renders_produce_distinct_files() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.pptx");
    write_minimal_template(&template);

    let renderer = DeckRenderer::new(&template, 0, 1);
    let first = renderer.render("Topic", &[], dir.path()).expect("render");
    let second = renderer.render("Topic", &[], dir.path()).expect("render");
    assert_eq!(first == second, false);
    assert_eq!(first.exists(), true);
    assert_eq!(second.exists(), true);
}

#[test]
fn out_of_range_layout_index_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.pptx");
    write_minimal_template(&template);

    let renderer = DeckRenderer::new(&template, 0, 7);
    let err = renderer
        .render("Topic", &[record("A", &["b"])], dir.path())
        .expect_err("layout out of range");
    match err {
        RenderError::LayoutIndex { index, available } => {
            assert_eq!(index, 7);
            assert_eq!(available, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_template_is_a_template_error() {
    let dir = tempdir().expect("tempdir");
    let renderer = DeckRenderer::new(dir.path().join("absent.pptx"), 0, 1);
    let err = renderer
        .render("Topic", &[], dir.path())
        .expect_err("missing template");
    assert_eq!(matches!(err, RenderError::Template(_)), true);
}
