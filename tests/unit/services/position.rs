use super::*;

const W: f64 = 1220.0;
const H: f64 = 600.0;

fn svc(seed: u64) -> PositionService {
    PositionService::with_seed(PositionConfig::default(), BoardDimensions::new(W, H), seed)
}

#[test]
fn staggered_slots_follow_their_bands() {
    for seed in 0..50 {
        let mut s = svc(seed);
        let p: Vec<_> = s.generate_multiple_offscreen_positions(8);
        assert!((W * 0.6 - 100.0..W * 0.6 + 100.0).contains(&p[0].x));
        assert!((W * 0.8 - 50.0..W * 0.8 + 50.0).contains(&p[1].x));
        assert!((W - 50.0..W + 50.0).contains(&p[2].x));
        assert!((W + 50.0..W + 150.0).contains(&p[3].x));
        assert!((W + 200.0..W + 300.0).contains(&p[4].x));
        for (slot, pos) in p[5..].iter().enumerate() {
            let base = W + 350.0 + slot as f64 * 150.0;
            assert!((base..base + 100.0).contains(&pos.x), "slot {slot}: {}", pos.x);
        }
        for pos in &p {
            assert!((20.0..H - 150.0).contains(&pos.y));
        }
    }
}

#[test]
fn wrap_threshold_is_the_item_width() {
    let s = svc(1);
    assert!(!s.should_wrap_around(Position::new(-100.0, 0.0), 100.0));
    assert!(s.should_wrap_around(Position::new(-100.5, 0.0), 100.0));
    assert!(!s.should_wrap_around(Position::new(50.0, 0.0), 100.0));
}

#[test]
fn wrap_position_lands_past_the_right_edge() {
    let mut s = svc(2);
    for _ in 0..200 {
        let p = s.get_wrap_around_position();
        assert!((W + 50.0..W + 150.0).contains(&p.x));
        assert!((20.0..H - 150.0).contains(&p.y));
    }
}

#[test]
fn next_position_moves_left_only() {
    let s = svc(3);
    let p = s.calculate_next_position(Position::new(500.0, 42.0), 150.0, 0.1);
    assert_eq!(p, Position::new(485.0, 42.0));
}

#[test]
fn board_update_is_not_retroactive_but_affects_wraps() {
    let mut s = svc(4);
    let before = s.generate_offscreen_position(3);
    s.update_board_dimensions(400.0, 300.0);
    assert_eq!(s.board_dimensions(), BoardDimensions::new(400.0, 300.0));
    let wrapped = s.get_wrap_around_position();
    assert!((450.0..550.0).contains(&wrapped.x));
    assert!(before.x > W);
}

#[test]
fn short_board_collapses_y_band() {
    let mut s = PositionService::with_seed(
        PositionConfig::default(),
        BoardDimensions::new(800.0, 100.0),
        5,
    );
    for _ in 0..20 {
        assert_eq!(s.get_wrap_around_position().y, 20.0);
    }
}

#[test]
fn viewport_overlap_check() {
    let s = svc(6);
    assert!(s.is_in_viewport(Position::new(-50.0, 10.0), 100.0, 100.0));
    assert!(!s.is_in_viewport(Position::new(-150.0, 10.0), 100.0, 100.0));
    assert!(!s.is_in_viewport(Position::new(W, 10.0), 100.0, 100.0));
    assert!(!s.is_in_viewport(Position::new(10.0, H), 100.0, 100.0));
}

#[test]
fn first_slot_band_is_fixed_jitter_around_sixty_percent() {
    let wide = BoardDimensions::new(1000.0, H);
    let narrow = BoardDimensions::new(800.0, H);
    for seed in 0..200 {
        let mut s = PositionService::with_seed(PositionConfig::default(), wide, seed);
        let x = s.generate_offscreen_position(0).x;
        assert!((500.0..=700.0).contains(&x), "{x}");

        let mut s = PositionService::with_seed(PositionConfig::default(), narrow, seed);
        let x = s.generate_offscreen_position(0).x;
        assert!((380.0..580.0).contains(&x), "{x}");
    }
}
