use super::*;
use crate::{
    foundation::core::{BoardDimensions, Position},
    model::item::{ImageContent, ImageSize, ItemId, TextContent},
};

fn image(id: &str, x: f64, z: i32) -> ScrollItem {
    rotated_image(id, x, z, 0.0)
}

fn rotated_image(id: &str, x: f64, z: i32, rotation: f64) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(x, 10.0),
        velocity: 100.0,
        z_index: z,
        rotation,
        content: ItemContent::Image(ImageContent {
            url: format!("{id}.png"),
            title: id.to_owned(),
            size: ImageSize::Small,
        }),
    }
}

fn text(id: &str, x: f64, z: i32) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(x, 10.0),
        velocity: 100.0,
        z_index: z,
        rotation: 0.0,
        content: ItemContent::Text(TextContent {
            text: "chalk".to_owned(),
            color: TextColor::Pink,
            font_size: 1.5,
        }),
    }
}

fn store_with(items: Vec<ScrollItem>) -> ItemStore {
    let mut store = ItemStore::new();
    store.set_board_dimensions(BoardDimensions::new(200.0, 150.0));
    store.add_items(items);
    store
}

#[test]
fn frame_is_scaled_board_size() {
    let store = store_with(vec![]);
    let frame = paint_frame(&store, &SizeConfig::default(), &SnapshotOptions::default()).unwrap();
    assert_eq!((frame.width, frame.height), (400, 300));
    assert_eq!(frame.pixel(0, 0), Some(SnapshotOptions::default().background));
    assert_eq!(frame.pixel(400, 0), None);
}

#[test]
fn higher_z_paints_on_top() {
    let store = store_with(vec![text("t", 0.0, 50), image("i", 0.0, 10)]);
    let frame = paint_frame(&store, &SizeConfig::default(), &SnapshotOptions::default()).unwrap();
    let px = frame.pixel(4, 24).unwrap();
    assert_ne!(px, IMAGE_TILE_RGBA);
    assert_ne!(px, SnapshotOptions::default().background);
    // Past the text's width only the image tile remains.
    assert_eq!(frame.pixel(190, 24), Some(IMAGE_TILE_RGBA));
}

#[test]
fn paused_frames_use_the_pause_cache() {
    let mut store = store_with(vec![image("i", 0.0, 10)]);
    store.set_paused(true, 1);
    store.save_paused_position(&ItemId::from("i"), 100.0);
    let opts = SnapshotOptions {
        scale: 1.0,
        ..SnapshotOptions::default()
    };
    let frame = paint_frame(&store, &SizeConfig::default(), &opts).unwrap();
    assert_eq!(frame.pixel(50, 20), Some(opts.background));
    assert_eq!(frame.pixel(150, 20), Some(IMAGE_TILE_RGBA));
}

#[test]
fn empty_board_is_an_export_error() {
    let store = ItemStore::new();
    assert!(matches!(
        paint_frame(&store, &SizeConfig::default(), &SnapshotOptions::default()),
        Err(WallError::Export(_))
    ));
    let store = store_with(vec![]);
    let bad = SnapshotOptions {
        scale: 0.0,
        ..SnapshotOptions::default()
    };
    assert!(paint_frame(&store, &SizeConfig::default(), &bad).is_err());
}

#[test]
fn rotation_turns_the_tile_about_its_center() {
    let opts = SnapshotOptions {
        scale: 1.0,
        ..SnapshotOptions::default()
    };
    let flat = paint_frame(
        &store_with(vec![rotated_image("i", 50.0, 10, 0.0)]),
        &SizeConfig::default(),
        &opts,
    )
    .unwrap();
    let turned = paint_frame(
        &store_with(vec![rotated_image("i", 50.0, 10, 20.0)]),
        &SizeConfig::default(),
        &opts,
    )
    .unwrap();

    assert_ne!(flat, turned);
    // The tile spans x 50..150, y 10..110; its center stays covered.
    assert_eq!(flat.pixel(100, 60), Some(IMAGE_TILE_RGBA));
    assert_eq!(turned.pixel(100, 60), Some(IMAGE_TILE_RGBA));
    // A corner swings out of the rotated tile.
    assert_eq!(flat.pixel(52, 12), Some(IMAGE_TILE_RGBA));
    assert_eq!(turned.pixel(52, 12), Some(opts.background));
}

#[test]
fn translucent_background_is_stored_unpremultiplied() {
    let opts = SnapshotOptions {
        scale: 1.0,
        background: [200, 100, 50, 128],
    };
    let frame = paint_frame(&store_with(vec![]), &SizeConfig::default(), &opts).unwrap();
    let [r, g, b, a] = frame.pixel(3, 3).unwrap();
    assert_eq!(a, 128);
    assert!(r.abs_diff(200) <= 2 && g.abs_diff(100) <= 2 && b.abs_diff(50) <= 2);
}
