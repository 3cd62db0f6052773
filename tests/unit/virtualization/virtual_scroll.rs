use super::*;
use crate::model::item::{ImageContent, ImageSize, ItemContent};

fn image_at(id: &str, x: f64, size: ImageSize) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: crate::foundation::core::Position::new(x, 100.0),
        velocity: 100.0,
        z_index: 10,
        rotation: 0.0,
        content: ItemContent::Image(ImageContent {
            url: format!("{id}.png"),
            title: id.to_owned(),
            size,
        }),
    }
}

fn scroll() -> VirtualScroll {
    VirtualScroll::new(&VirtualizationConfig::default(), Size::new(1000.0, 600.0))
}

#[test]
fn point_check_uses_buffer_zone() {
    let v = scroll();
    assert!(v.in_buffer_zone(-200.0));
    assert!(v.in_buffer_zone(1200.0));
    assert!(!v.in_buffer_zone(-200.5));
    assert!(!v.in_buffer_zone(1200.5));
}

#[test]
fn virtual_items_union_point_check_and_tracker() {
    let mut v = scroll();
    let items = vec![
        image_at("in", 500.0, ImageSize::Small),
        image_at("far-left", -400.0, ImageSize::Small),
        image_at("far-right", 3000.0, ImageSize::Small),
    ];
    let ids: Vec<_> = v.virtual_items(&items).iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids, vec![ItemId::from("in")]);

    v.tracker_mut().observe(ItemId::from("far-left"));
    let far_left = vec![image_at("far-left", -280.0, ImageSize::Xlarge)];
    let changes = v.refresh(&far_left, &SizeConfig::default());
    assert_eq!(changes, vec![IntersectionChange::Enter(ItemId::from("far-left"))]);
    assert_eq!(v.virtual_items(&items).len(), 2);
}

#[test]
fn tracker_emits_enter_then_exit() {
    let sizes = SizeConfig::default();
    let viewport = Rect::new(0.0, 0.0, 1000.0, 600.0);
    let mut t = IntersectionTracker::new(100.0);
    t.observe(ItemId::from("a"));

    // Right edge at -100 touches the grown viewport.
    let touching = vec![image_at("a", -200.0, ImageSize::Small)];
    assert_eq!(
        t.update(viewport, &touching, &sizes),
        vec![IntersectionChange::Enter(ItemId::from("a"))]
    );
    assert!(t.update(viewport, &touching, &sizes).is_empty());

    let gone = vec![image_at("a", -201.0, ImageSize::Small)];
    assert_eq!(
        t.update(viewport, &gone, &sizes),
        vec![IntersectionChange::Exit(ItemId::from("a"))]
    );
    assert!(!t.is_intersecting(&ItemId::from("a")));
}

#[test]
fn unobserved_items_are_ignored() {
    let sizes = SizeConfig::default();
    let viewport = Rect::new(0.0, 0.0, 1000.0, 600.0);
    let mut t = IntersectionTracker::new(100.0);
    let items = vec![image_at("a", 10.0, ImageSize::Small)];
    assert!(t.update(viewport, &items, &sizes).is_empty());

    t.observe(ItemId::from("a"));
    t.update(viewport, &items, &sizes);
    assert!(t.is_intersecting(&ItemId::from("a")));
    t.unobserve(&ItemId::from("a"));
    assert!(!t.is_intersecting(&ItemId::from("a")));
    assert!(!t.is_observed(&ItemId::from("a")));

    t.observe(ItemId::from("a"));
    t.update(viewport, &items, &sizes);
    t.unobserve_all();
    assert!(t.intersecting_ids().is_empty());
}

#[test]
fn stats_report_reduction_rate() {
    let mut v = scroll();
    assert_eq!(v.rendering_stats(&[]), RenderingStats::default());

    let items = vec![
        image_at("a", 100.0, ImageSize::Small),
        image_at("b", 5000.0, ImageSize::Small),
        image_at("c", 6000.0, ImageSize::Small),
    ];
    v.observe_all(&items);
    v.refresh(&items, &SizeConfig::default());
    let stats = v.rendering_stats(&items);
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.virtual_items, 1);
    assert_eq!(stats.visible_items, 1);
    assert_eq!(stats.reduction_rate, 67);
}
