use super::*;
use crate::foundation::error::WallError;

fn factory() -> ContentFactory {
    ContentFactory::with_seed(&ScrollConfig::default(), 7)
}

#[test]
fn truncates_to_thirty_chars_with_ellipsis() {
    assert_eq!(truncate_text("short", 30), "short");
    let exact = "a".repeat(30);
    assert_eq!(truncate_text(&exact, 30), exact);
    let long = "b".repeat(31);
    assert_eq!(truncate_text(&long, 30), format!("{}...", "b".repeat(30)));
}

#[test]
fn truncation_respects_char_boundaries() {
    let s = "あ".repeat(40);
    let t = truncate_text(&s, 30);
    assert_eq!(t.chars().count(), 33);
    assert!(t.ends_with("..."));
}

#[test]
fn image_title_defaults() {
    let mut f = factory();
    let c = f.create_image_content(&ImageData::new("https://x.test/a.png")).unwrap();
    assert_eq!(c.title, DEFAULT_IMAGE_TITLE);
    let c = f.create_image_content_with_size(
        &ImageData {
            url: "u".to_owned(),
            title: Some(String::new()),
        },
        ImageSize::Xlarge,
    );
    assert_eq!(c.title, DEFAULT_IMAGE_TITLE);
    assert_eq!(c.size, ImageSize::Xlarge);
}

#[test]
fn random_sizes_cover_the_table() {
    let mut f = factory();
    let data = ImageData::new("u");
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(f.create_image_content(&data).unwrap().size);
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn text_attributes_stay_in_range() {
    let mut f = factory();
    for _ in 0..200 {
        let c = f.create_text_content("hello wall").unwrap();
        assert!((1.2..2.0).contains(&c.font_size));
        assert!(TextColor::ALL.contains(&c.color));
        assert!(f.validate_text_content(&c));
    }
}

#[test]
fn fixed_color_and_font_size() {
    let mut f = factory();
    let c = f.create_text_content_with_color("hi", TextColor::White, Some(1.7));
    assert_eq!(c.color, TextColor::White);
    assert_eq!(c.font_size, 1.7);
}

#[test]
fn empty_color_table_fails_loudly() {
    let mut cfg = ScrollConfig::default();
    cfg.colors.clear();
    let mut f = ContentFactory::with_seed(&cfg, 1);
    let err = f.create_text_content("x").unwrap_err();
    assert!(matches!(err, WallError::EmptyChoice(_)));
}

#[test]
fn batches_preserve_order() {
    let mut f = factory();
    let imgs = f
        .create_image_content_batch(&[ImageData::new("a"), ImageData::new("b")])
        .unwrap();
    assert_eq!(imgs[0].url, "a");
    assert_eq!(imgs[1].url, "b");
    let texts = f
        .create_text_content_batch(&["one".to_owned(), "two".to_owned()])
        .unwrap();
    assert_eq!(texts[1].text, "two");
}

#[test]
fn validators_reject_missing_fields() {
    let f = factory();
    let bad_img = ImageContent {
        url: String::new(),
        title: "t".to_owned(),
        size: ImageSize::Small,
    };
    assert!(!f.validate_image_content(&bad_img));
    let bad_text = TextContent {
        text: "x".to_owned(),
        color: TextColor::Blue,
        font_size: 0.0,
    };
    assert!(!f.validate_text_content(&bad_text));
}
