use super::*;

#[test]
fn raw_feed_splits_images_and_texts() {
    let json = br#"[
        {"media_url_https": "https://x.test/1.jpg", "text": "first"},
        {"media_url_https": "https://x.test/2.jpg"},
        {"text": "just words"},
        {"text": ""},
        {"media_url_https": null, "text": "null url"}
    ]"#;
    let media = MediaData::from_raw_json(json).unwrap();
    assert_eq!(media.images.len(), 2);
    assert_eq!(media.images[0].title.as_deref(), Some("first"));
    assert_eq!(media.images[1].title.as_deref(), Some(DEFAULT_IMAGE_TITLE));
    assert_eq!(media.texts, vec!["first", "just words", "null url"]);
}

#[test]
fn raw_feed_is_capped() {
    let entries: Vec<_> = (0..100)
        .map(|i| serde_json::json!({"media_url_https": format!("u{i}"), "text": format!("t{i}")}))
        .collect();
    let bytes = serde_json::to_vec(&entries).unwrap();
    let media = MediaData::from_raw_json(&bytes).unwrap();
    assert_eq!(media.images.len(), MAX_FEED_IMAGES);
    assert_eq!(media.texts.len(), MAX_FEED_TEXTS);
    assert_eq!(media.texts[0], "t0");
}

#[test]
fn normalized_shape_is_accepted() {
    let json = br#"{"images": [{"url": "a.png", "title": "A"}], "texts": ["hello"]}"#;
    let media = MediaData::from_raw_json(json).unwrap();
    assert_eq!(media.images, vec![ImageData {
        url: "a.png".to_owned(),
        title: Some("A".to_owned()),
    }]);
    assert_eq!(media.texts, vec!["hello"]);
    assert!(!media.is_empty());
}

#[test]
fn non_array_documents_are_rejected() {
    assert!(matches!(
        MediaData::from_raw_json(b"42"),
        Err(WallError::Validation(_))
    ));
    assert!(matches!(
        MediaData::from_raw_json(b"[1, 2]"),
        Err(WallError::Validation(_))
    ));
    assert!(matches!(
        MediaData::from_raw_json(b"not json"),
        Err(WallError::Serde(_))
    ));
}

#[test]
fn validators() {
    assert!(validate_image_data(&ImageData::new("u")));
    assert!(!validate_image_data(&ImageData::new("")));
    assert!(validate_text_data(" hi "));
    assert!(!validate_text_data("   "));
}
