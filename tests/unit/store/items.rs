use super::*;
use crate::{
    config::scroll::VelocityConfig,
    model::item::{ImageContent, ImageSize, TextColor, TextContent},
};

fn image(id: &str, z: i32) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(100.0, 50.0),
        velocity: 100.0,
        z_index: z,
        rotation: 0.0,
        content: ItemContent::Image(ImageContent {
            url: format!("https://example.test/{id}.jpg"),
            title: id.to_owned(),
            size: ImageSize::Medium,
        }),
    }
}

fn text(id: &str, z: i32) -> ScrollItem {
    ScrollItem {
        id: ItemId::from(id),
        position: Position::new(200.0, 80.0),
        velocity: 60.0,
        z_index: z,
        rotation: 0.0,
        content: ItemContent::Text(TextContent {
            text: "chalk".to_owned(),
            color: TextColor::Yellow,
            font_size: 1.5,
        }),
    }
}

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

#[test]
fn add_and_remove_keep_index_in_sync() {
    let mut s = ItemStore::new();
    s.add_items((0..10).map(|i| image(&format!("img-{i}"), i)));
    assert!(s.index_is_consistent());

    s.remove_item(&id("img-3"));
    s.remove_items(&[id("img-0"), id("img-9"), id("missing")]);
    assert!(s.index_is_consistent());
    assert_eq!(s.items().len(), 7);
    assert!(s.get_item_by_id(&id("img-3")).is_none());
    assert_eq!(s.get_item_by_id(&id("img-5")).unwrap().z_index, 5);

    s.add_item(image("img-3", 30));
    assert!(s.index_is_consistent());
    assert_eq!(s.items().last().unwrap().id, id("img-3"));
}

#[test]
fn duplicate_ids_are_not_added_twice() {
    let mut s = ItemStore::new();
    s.add_item(image("a", 1));
    s.add_item(image("a", 2));
    assert_eq!(s.items().len(), 1);
    assert_eq!(s.get_item_by_id(&id("a")).unwrap().z_index, 1);
    assert!(s.index_is_consistent());
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let mut s = ItemStore::new();
    s.add_item(image("a", 1));
    let ghost = id("ghost");
    s.update_item_position(&ghost, Position::new(1.0, 1.0));
    s.update_item_velocity(&ghost, 5.0);
    s.update_item_z_index(&ghost, 5);
    s.update_item(&ghost, ItemPatch::default());
    s.bring_to_front(&ghost);
    s.remove_item(&ghost);
    assert_eq!(s.items().len(), 1);
    assert_eq!(s.get_item_by_id(&id("a")).unwrap().z_index, 1);
}

#[test]
fn position_updates_go_through_the_index() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 1), image("b", 2)]);
    s.update_item_position(&id("b"), Position::new(-5.0, 9.0));
    s.update_item_position_direct(&id("a"), 7.0, 8.0);
    assert_eq!(s.get_item_by_id(&id("b")).unwrap().position, Position::new(-5.0, 9.0));
    assert_eq!(s.get_item_by_id(&id("a")).unwrap().position, Position::new(7.0, 8.0));
}

#[test]
fn global_velocity_is_clamped() {
    let mut s = ItemStore::new();
    assert_eq!(s.global_velocity(), 100.0);
    s.update_global_velocity(200.0);
    assert_eq!(s.global_velocity(), 150.0);
    s.update_global_velocity(5.0);
    assert_eq!(s.global_velocity(), 10.0);
    s.set_speed_multiplier(0.75);
    assert_eq!(s.global_velocity(), 75.0);
    assert_eq!(s.speed_multiplier(), 0.75);
}

#[test]
fn item_count_is_at_least_one() {
    let mut s = ItemStore::new();
    s.update_item_count(0);
    assert_eq!(s.item_count(), 1);
}

#[test]
fn visible_items_respect_count_and_text_toggle() {
    let mut s = ItemStore::new();
    for i in 0..15 {
        s.add_item(image(&format!("i{i}"), 10));
        s.add_item(text(&format!("t{i}"), 10));
    }
    assert_eq!(s.visible_items().len(), 20);
    s.toggle_texts();
    let v = s.visible_items();
    assert_eq!(v.len(), 15);
    assert!(v.iter().all(|i| i.is_image()));
    s.set_show_texts(true);
    s.update_item_count(3);
    let ids: Vec<_> = s.visible_items().iter().map(|i| i.id.0.clone()).collect();
    assert_eq!(ids, ["i0", "t0", "i1"]);
}

#[test]
fn bring_to_front_uses_max_plus_one() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 12), image("b", 40), text("c", 25)]);
    s.bring_to_front(&id("a"));
    assert_eq!(s.get_item_by_id(&id("a")).unwrap().z_index, 41);
    let order: Vec<_> = s.sorted_by_z_index().iter().map(|i| i.id.0.clone()).collect();
    assert_eq!(order, ["c", "b", "a"]);
}

#[test]
fn counts_and_kind_views() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 1), text("b", 1), text("c", 1)]);
    assert_eq!(
        s.items_count(),
        ItemsCount {
            total: 3,
            images: 1,
            texts: 2
        }
    );
    assert_eq!(s.image_items().len(), 1);
    assert_eq!(s.text_items().len(), 2);
    assert_eq!(s.get_items_by_type(ItemKind::Text).len(), 2);
}

#[test]
fn update_item_applies_patch() {
    let mut s = ItemStore::new();
    s.add_item(image("a", 1));
    s.update_item(
        &id("a"),
        ItemPatch {
            velocity: Some(-3.0),
            rotation: Some(12.0),
            ..ItemPatch::default()
        },
    );
    let a = s.get_item_by_id(&id("a")).unwrap();
    assert_eq!(a.velocity, 0.0);
    assert_eq!(a.rotation, 12.0);
    assert_eq!(a.z_index, 1);
}

#[test]
fn update_all_velocities_recomputes_every_item() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 1), text("b", 1)]);
    let mut v = VelocityService::with_seed(VelocityConfig::default(), 1);
    v.set_global_multiplier(10.0);
    s.update_all_velocities(&mut v);
    for item in s.items() {
        assert!(item.velocity <= 150.0 * 0.1 * 1.6);
    }
}

#[test]
fn removal_purges_pause_cache() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 1), image("b", 1), image("c", 1)]);
    s.set_paused(true, 1);
    for i in ["a", "b", "c"] {
        s.save_paused_position(&id(i), 10.0);
    }
    s.remove_item(&id("a"));
    s.remove_items(&[id("b")]);
    let cached: Vec<_> = s.pause_state().paused_positions.keys().cloned().collect();
    assert_eq!(cached, [id("c")]);
}

#[test]
fn pause_cache_ignores_running_state_and_dead_ids() {
    let mut s = ItemStore::new();
    s.add_item(image("a", 1));
    s.save_paused_position(&id("a"), 5.0);
    assert!(s.pause_state().paused_positions.is_empty());
    s.set_paused(true, 1);
    s.save_paused_position(&id("ghost"), 5.0);
    assert!(s.pause_state().paused_positions.is_empty());
}

#[test]
fn set_paused_counts_only_effective_writes() {
    let mut s = ItemStore::new();
    s.set_paused(false, 1);
    assert_eq!(s.pause_writes(), 0);
    s.set_paused(true, 42);
    s.set_paused(true, 43);
    assert_eq!(s.pause_writes(), 1);
    assert_eq!(s.pause_timestamp(), Some(42));
    s.toggle_pause(50);
    assert!(!s.is_paused());
    assert_eq!(s.pause_timestamp(), None);
    assert_eq!(s.pause_writes(), 2);
}

#[test]
fn clear_and_set_items_bump_epoch() {
    let mut s = ItemStore::new();
    let e0 = s.epoch();
    s.set_items(vec![image("a", 1), image("a", 2), image("b", 3)]);
    assert_eq!(s.items().len(), 2);
    assert!(s.epoch() > e0);
    let e1 = s.epoch();
    s.clear_items();
    assert!(s.items().is_empty());
    assert!(s.epoch() > e1);
    assert!(s.index_is_consistent());
}

#[test]
fn reset_restores_documented_defaults() {
    let mut s = ItemStore::new();
    s.add_items([image("a", 1), text("b", 1)]);
    s.update_global_velocity(120.0);
    s.update_item_count(3);
    s.set_show_texts(false);
    s.set_board_dimensions(BoardDimensions::new(800.0, 600.0));
    s.set_paused(true, 9);
    s.save_paused_position(&id("a"), 1.0);

    s.reset();

    assert!(s.items().is_empty());
    assert!(s.index_is_consistent());
    assert_eq!(s.global_velocity(), 50.0);
    assert_eq!(s.item_count(), 20);
    assert!(s.show_texts());
    assert_eq!(s.board_dimensions(), BoardDimensions::default());
    assert!(!s.is_paused());
    assert!(s.pause_state().paused_positions.is_empty());
    assert_eq!(s.pause_timestamp(), None);
}
