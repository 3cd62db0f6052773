use super::*;
use crate::{
    config::scroll::PositionConfig,
    model::item::{ImageContent, ImageSize, ItemContent, ScrollItem, TextColor, TextContent},
};

const BOARD: BoardDimensions = BoardDimensions::new(1220.0, 600.0);

fn image(id: &str, x: f64, velocity: f64) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(x, 100.0),
        velocity,
        z_index: 10,
        rotation: 0.0,
        content: ItemContent::Image(ImageContent {
            url: "u".to_owned(),
            title: "t".to_owned(),
            size: ImageSize::Small,
        }),
    }
}

fn text(id: &str, x: f64, velocity: f64) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(x, 100.0),
        velocity,
        z_index: 10,
        rotation: 0.0,
        content: ItemContent::Text(TextContent {
            text: "abcde".to_owned(),
            color: TextColor::Blue,
            font_size: 2.0,
        }),
    }
}

fn store(items: Vec<ScrollItem>) -> ItemStore {
    let mut s = ItemStore::new();
    s.set_board_dimensions(BOARD);
    s.add_items(items);
    s
}

fn engine() -> DirectEngine {
    let cfg = ScrollConfig::default();
    let ps = PositionService::with_seed(PositionConfig::default(), BOARD, 3);
    DirectEngine::with_seed(&cfg, Some(ps), 4)
}

fn x_of(s: &ItemStore, id: &str) -> f64 {
    s.get_item_by_id(&ItemId::from(id)).unwrap().position.x
}

#[test]
fn moves_items_left_by_velocity_times_delta() {
    let mut s = store(vec![image("a", 500.0, 100.0), text("b", 300.0, 50.0)]);
    let mut e = engine();
    e.start(0.0);
    e.on_frame(50.0, &mut s).unwrap();
    assert!((x_of(&s, "a") - 495.0).abs() < 1e-9);
    assert!((x_of(&s, "b") - 297.5).abs() < 1e-9);
    assert_eq!(s.get_item_by_id(&ItemId::from("a")).unwrap().position.y, 100.0);
}

#[test]
fn large_gaps_are_clamped() {
    let mut s = store(vec![image("a", 500.0, 100.0)]);
    let mut e = engine();
    e.start(0.0);
    e.on_frame(10_000.0, &mut s).unwrap();
    assert!((x_of(&s, "a") - 490.0).abs() < 1e-9);
}

#[test]
fn exited_items_wrap_to_the_right_edge() {
    // small image: width 100; text "abcde" at 2em: width 120
    let mut s = store(vec![image("a", -99.0, 100.0), text("b", -119.0, 100.0)]);
    let mut e = engine();
    e.start(0.0);
    e.on_frame(100.0, &mut s).unwrap();
    for id in ["a", "b"] {
        let x = x_of(&s, id);
        assert!((BOARD.width + 50.0..BOARD.width + 150.0).contains(&x), "{id}: {x}");
    }
}

#[test]
fn fallback_relocates_without_position_service() {
    let mut s = store(vec![image("a", -99.0, 100.0)]);
    let mut e = DirectEngine::with_seed(&ScrollConfig::default(), None, 1);
    e.start(0.0);
    e.on_frame(100.0, &mut s).unwrap();
    let p = s.get_item_by_id(&ItemId::from("a")).unwrap().position;
    assert!((BOARD.width + 200.0..BOARD.width + 400.0).contains(&p.x));
    assert!((20.0..=20.0 + BOARD.height - 170.0).contains(&p.y));
}

#[test]
fn only_visible_items_move() {
    let mut s = store((0..5).map(|i| image(&format!("i{i}"), 500.0, 100.0)).collect());
    s.update_item_count(2);
    let mut e = engine();
    e.start(0.0);
    e.on_frame(100.0, &mut s).unwrap();
    assert!(x_of(&s, "i0") < 500.0);
    assert!(x_of(&s, "i1") < 500.0);
    assert_eq!(x_of(&s, "i2"), 500.0);
}

#[test]
fn paused_store_keeps_ticking_but_not_moving() {
    let mut s = store(vec![image("a", 500.0, 100.0)]);
    let mut e = engine();
    e.start(0.0);
    s.set_paused(true, 1);
    for f in 1..=10 {
        e.on_frame(f as f64 * 16.0, &mut s).unwrap();
    }
    assert_eq!(x_of(&s, "a"), 500.0);
    assert!(e.is_running());
}

#[test]
fn frames_after_stop_are_ignored() {
    let mut s = store(vec![image("a", 500.0, 100.0)]);
    let mut e = engine();
    e.start(0.0);
    e.stop();
    e.on_frame(50.0, &mut s).unwrap();
    assert_eq!(x_of(&s, "a"), 500.0);

    e.toggle(1_000.0);
    assert!(e.is_running());
    e.on_frame(1_050.0, &mut s).unwrap();
    assert!((x_of(&s, "a") - 495.0).abs() < 1e-9);
}

#[test]
fn batching_does_not_change_outcome() {
    let items: Vec<_> = (0..23).map(|i| image(&format!("i{i}"), 400.0 + i as f64, 80.0)).collect();
    let mut s = store(items);
    s.update_item_count(100);
    let mut e = engine();
    e.start(0.0);
    e.on_frame(16.0, &mut s).unwrap();
    for i in 0..23 {
        let expected = 400.0 + i as f64 - 80.0 * 0.016;
        assert!((x_of(&s, &format!("i{i}")) - expected).abs() < 1e-9);
    }
}

#[test]
fn resize_reaches_the_position_service() {
    let mut e = engine();
    e.handle_resize(BoardDimensions::new(640.0, 480.0));
    assert_eq!(
        e.position_service().unwrap().board_dimensions(),
        BoardDimensions::new(640.0, 480.0)
    );
}

#[test]
fn performance_info_reports_visible_count() {
    let mut s = store((0..30).map(|i| image(&format!("i{i}"), 500.0, 1.0)).collect());
    let mut e = engine();
    e.start(0.0);
    e.on_frame(16.0, &mut s).unwrap();
    let info = e.performance_info(&s);
    assert!(info.is_running);
    assert_eq!(info.item_count, 20);
    assert_eq!(info.worker_status, None);
}
